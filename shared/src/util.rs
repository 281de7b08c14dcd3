//! Small shared utilities

/// Current Unix time in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_millis_is_recent() {
        // 2024-01-01 as a floor; catches accidental seconds/millis confusion
        assert!(now_millis() > 1_704_067_200_000);
    }
}
