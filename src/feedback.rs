use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Funny,
    NotFunny,
}

impl Rating {
    pub fn label(self) -> &'static str {
        match self {
            Rating::Funny => "👍 Funny!",
            Rating::NotFunny => "👎 Not Funny",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// TODO: hand ratings to an analytics sink once one exists; today they are only acknowledged.
pub fn record_feedback(rating: Rating) -> String {
    acknowledge(rating.label())
}

pub fn acknowledge(label: &str) -> String {
    format!("Thanks for your feedback! You rated: {label}")
}
