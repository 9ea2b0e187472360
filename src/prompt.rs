//! Prompt construction.
//!
//! The labels and delimiter below are the only coupling between the prompt
//! and [`crate::parser`]: the model is told to emit them and the parser looks
//! for them.

use crate::model::RequestParameters;

/// Label the model is told to put before each dish name.
pub const NAME_LABEL: &str = "料理名：";

/// Label the model is told to put before each description.
pub const DESCRIPTION_LABEL: &str = "説明：";

/// Separator between consecutive suggestions.
pub const SUGGESTION_DELIMITER: &str = "---次の提案---";

/// Build the instruction sent to the text service for one request.
pub fn build_prompt(params: &RequestParameters) -> String {
    let cooking_time = params.cooking_time();
    let time_clause = if cooking_time.is_specified() {
        format!("調理時間は{}を目安とした、", cooking_time.term())
    } else {
        String::new()
    };

    format!(
        "今日の{meal}におすすめの、{cuisine}で、{time_clause}美味しくて比較的簡単に作れる料理を{count}品提案してください。\
         各提案は「{name}<ここに料理名>\n{desc}<ここに料理の説明（2〜3文程度）>」の形式で記述し、\
         提案と提案の間は「{delimiter}」という区切り文字で明確に区切ってください。",
        meal = params.meal_time().term(),
        cuisine = params.cuisine().term(),
        time_clause = time_clause,
        count = params.count(),
        name = NAME_LABEL,
        desc = DESCRIPTION_LABEL,
        delimiter = SUGGESTION_DELIMITER,
    )
}
