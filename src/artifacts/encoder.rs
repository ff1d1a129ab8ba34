use serde::{Deserialize, Serialize};

/// Maps categorical values to integer codes by position in a sorted class list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Returns `None` for values outside the fitted classes.
    pub fn code(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_sorted_order() {
        let encoder = LabelEncoder::fit(["TikTok", "YouTube", "Instagram", "TikTok"]);
        assert_eq!(encoder.classes, vec!["Instagram", "TikTok", "YouTube"]);
        assert_eq!(encoder.code("Instagram"), Some(0));
        assert_eq!(encoder.code("YouTube"), Some(2));
    }

    #[test]
    fn unseen_value_has_no_code() {
        let encoder = LabelEncoder::fit(["TikTok"]);
        assert_eq!(encoder.code("UnknownPlatform"), None);
        assert_eq!(encoder.code("tiktok"), None);
    }
}
