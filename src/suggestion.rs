//! ConversationSuggestion struct - the structured output from the generation service.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured suggestion returned by the LLM.
///
/// The derived schema is sent along with every request so the model answers in
/// this exact shape. Field names on the wire are camelCase (`loiChao`,
/// `phanTich`, `hieuLamCoTheXayRa`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSuggestion {
    /// Opening line
    #[schemars(
        description = "Câu gợi ý súc tích, tự nhiên để bắt đầu cuộc trò chuyện. Viết bằng tiếng Việt."
    )]
    pub loi_chao: String,
    /// Why the opening line fits the situation
    #[schemars(
        description = "Phân tích chi tiết tại sao lời chào này lại phù hợp và hiệu quả trong bối cảnh đã cho, giải thích về mặt tâm lý và giao tiếp. Viết bằng tiếng Việt."
    )]
    pub phan_tich: String,
    /// Misunderstandings the opening line could cause, and how to avoid them
    #[schemars(
        description = "Phân tích những hiểu lầm tiềm ẩn có thể xảy ra khi sử dụng lời chào này và gợi ý cách phòng tránh. Viết bằng tiếng Việt."
    )]
    pub hieu_lam_co_the_xay_ra: String,
}

impl ConversationSuggestion {
    /// Wire names of the required fields, in display order
    pub const FIELDS: [&'static str; 3] = ["loiChao", "phanTich", "hieuLamCoTheXayRa"];

    pub fn new(
        loi_chao: impl Into<String>,
        phan_tich: impl Into<String>,
        hieu_lam_co_the_xay_ra: impl Into<String>,
    ) -> Self {
        Self {
            loi_chao: loi_chao.into(),
            phan_tich: phan_tich.into(),
            hieu_lam_co_the_xay_ra: hieu_lam_co_the_xay_ra.into(),
        }
    }

    /// JSON schema for the `responseJsonSchema` generation option.
    ///
    /// Meta keys (`$schema`, `title`) are dropped; the service only needs the
    /// object shape.
    pub fn response_schema() -> Value {
        let mut schema = serde_json::to_value(schemars::schema_for!(ConversationSuggestion))
            .unwrap_or(Value::Null);
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
            object.remove("title");
        }
        schema
    }

    /// Build a suggestion from a parsed JSON object, checking every required
    /// field is present and is a string.
    ///
    /// Returns the name of the first offending field on failure.
    pub fn from_value(value: &Value) -> Result<Self, &'static str> {
        let field = |name: &'static str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(name)
        };

        Ok(Self {
            loi_chao: field("loiChao")?,
            phan_tich: field("phanTich")?,
            hieu_lam_co_the_xay_ra: field("hieuLamCoTheXayRa")?,
        })
    }

    /// Section contents in display order: opening line, analysis, misunderstandings
    pub fn sections(&self) -> [&str; 3] {
        [
            self.loi_chao.as_str(),
            self.phan_tich.as_str(),
            self.hieu_lam_co_the_xay_ra.as_str(),
        ]
    }
}
