use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::SuggestError;

/// Smallest number of dishes that can be requested at once.
pub const MIN_COUNT: u8 = 1;
/// Largest number of dishes that can be requested at once.
pub const MAX_COUNT: u8 = 5;

/// A single meal suggestion extracted from the model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub description: String,
}

/// Which meal of the day the suggestions are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MealTime {
    Breakfast,
    Lunch,
    #[default]
    Dinner,
}

impl MealTime {
    /// The term used for this meal time inside the prompt.
    pub fn term(&self) -> &'static str {
        match self {
            MealTime::Breakfast => "朝食",
            MealTime::Lunch => "昼食",
            MealTime::Dinner => "夕食",
        }
    }
}

impl FromStr for MealTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "朝食" => Ok(MealTime::Breakfast),
            "lunch" | "昼食" => Ok(MealTime::Lunch),
            "dinner" | "夕食" => Ok(MealTime::Dinner),
            other => Err(format!(
                "unknown meal time '{}' (expected breakfast, lunch or dinner)",
                other
            )),
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.term())
    }
}

/// Cuisine style of the suggested dishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cuisine {
    #[default]
    Japanese,
    Western,
    Chinese,
}

impl Cuisine {
    pub fn term(&self) -> &'static str {
        match self {
            Cuisine::Japanese => "和食",
            Cuisine::Western => "洋食",
            Cuisine::Chinese => "中華",
        }
    }
}

impl FromStr for Cuisine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "japanese" | "和食" => Ok(Cuisine::Japanese),
            "western" | "洋食" => Ok(Cuisine::Western),
            "chinese" | "中華" => Ok(Cuisine::Chinese),
            other => Err(format!(
                "unknown cuisine '{}' (expected japanese, western or chinese)",
                other
            )),
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.term())
    }
}

/// Upper bound on the expected cooking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookingTime {
    #[default]
    Unspecified,
    Within15,
    Within30,
    Within60,
}

impl CookingTime {
    pub fn term(&self) -> &'static str {
        match self {
            CookingTime::Unspecified => "指定なし",
            CookingTime::Within15 => "15分以内",
            CookingTime::Within30 => "30分以内",
            CookingTime::Within60 => "60分以内",
        }
    }

    pub fn is_specified(&self) -> bool {
        !matches!(self, CookingTime::Unspecified)
    }
}

impl FromStr for CookingTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "any" | "unspecified" | "指定なし" => Ok(CookingTime::Unspecified),
            "15" | "15m" | "15min" | "15分以内" => Ok(CookingTime::Within15),
            "30" | "30m" | "30min" | "30分以内" => Ok(CookingTime::Within30),
            "60" | "60m" | "60min" | "60分以内" => Ok(CookingTime::Within60),
            other => Err(format!(
                "unknown cooking time '{}' (expected none, 15, 30 or 60)",
                other
            )),
        }
    }
}

impl fmt::Display for CookingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.term())
    }
}

/// The user's choices for one suggestion request.
///
/// Values are validated on construction and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParameters {
    meal_time: MealTime,
    cuisine: Cuisine,
    count: u8,
    cooking_time: CookingTime,
}

impl RequestParameters {
    /// Create request parameters, rejecting a count outside `1..=5`.
    pub fn new(
        meal_time: MealTime,
        cuisine: Cuisine,
        count: u8,
        cooking_time: CookingTime,
    ) -> Result<Self, SuggestError> {
        if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
            return Err(SuggestError::InvalidParameter(format!(
                "suggestion count must be between {} and {}, got {}",
                MIN_COUNT, MAX_COUNT, count
            )));
        }

        Ok(Self {
            meal_time,
            cuisine,
            count,
            cooking_time,
        })
    }

    pub fn meal_time(&self) -> MealTime {
        self.meal_time
    }

    pub fn cuisine(&self) -> Cuisine {
        self.cuisine
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn cooking_time(&self) -> CookingTime {
        self.cooking_time
    }
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self {
            meal_time: MealTime::default(),
            cuisine: Cuisine::default(),
            count: MIN_COUNT,
            cooking_time: CookingTime::default(),
        }
    }
}

/// Result of a successful round trip to the text service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    /// At least one suggestion was extracted, in the order the model gave them
    Suggestions(Vec<Suggestion>),
    /// The service answered but nothing usable could be extracted
    NoMatch,
}

impl SuggestOutcome {
    /// Notice shown to the user when nothing could be extracted.
    pub const NO_MATCH_MESSAGE: &'static str =
        "条件に合う料理が見つかりませんでした。条件を変えてお試しください。";

    pub fn from_suggestions(suggestions: Vec<Suggestion>) -> Self {
        if suggestions.is_empty() {
            SuggestOutcome::NoMatch
        } else {
            SuggestOutcome::Suggestions(suggestions)
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            SuggestOutcome::Suggestions(list) => list,
            SuggestOutcome::NoMatch => &[],
        }
    }
}
