// Inference request model
// Author: kelexine (https://github.com/kelexine)

use super::gemini::{Content, GenerateContentRequest, Part};
use crate::vision::ImagePayload;
use std::sync::Arc;

/// Instruction sent ahead of every image. It tells the model to do the OCR
/// and the query matching itself.
pub const INSTRUCTION_PROMPT: &str = "\
You are a highly intelligent AI model tasked with reading and understanding text from images. Here's how you should handle the process:

Image Understanding: When an image is provided, use advanced Optical Character Recognition (OCR) techniques to accurately extract every detail of readable text from the image. This includes both printed and handwritten text, even in challenging image conditions.

Query-Based Text Extraction: After extracting the text, wait for a specific input or query from the user. This query may be a keyword, phrase, or question related to the text in the image. Your job is to search through the extracted text and find the exact or most relevant parts that match the user's input.

Precise Response: Once you identify the relevant portion of the text based on the query, return that specific information as the answer. Ensure the response is concise, accurate, and directly addresses the user’s query.

Fallback and Suggestions: If no matching text is found or if the query is unclear, provide a friendly response indicating that no relevant information was found. Suggest the user refine their query or check the image quality for better text extraction.

User-Friendly Output: Ensure that the final output is clear and easy to understand, with the option to display, download, or copy the relevant text as required by the user.
";

/// One in-flight call: instruction, image, and the user's query.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub instruction: Arc<str>,
    pub image: ImagePayload,
    /// May be empty.
    pub query: String,
}

impl InferenceRequest {
    pub fn new(instruction: Arc<str>, image: ImagePayload, query: impl Into<String>) -> Self {
        Self {
            instruction,
            image,
            query: query.into(),
        }
    }

    /// Build the Gemini body: a single user turn with the parts in the order
    /// instruction, image, query.
    pub fn to_gemini_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::text(&*self.instruction),
                    Part::InlineData {
                        inline_data: self.image.to_inline_data(),
                    },
                    Part::text(self.query.as_str()),
                ],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_parts_order() {
        let request = InferenceRequest::new(
            Arc::from("read it"),
            ImagePayload {
                mime_type: "image/png".to_string(),
                data: Bytes::from_static(b"abc"),
            },
            "",
        );

        let body = serde_json::to_value(request.to_gemini_request()).unwrap();
        let parts = &body["contents"][0]["parts"];

        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(parts.as_array().unwrap().len(), 3);
        assert_eq!(parts[0]["text"], "read it");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "YWJj");
        assert_eq!(parts[2]["text"], "");
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["contents"]);
    }

    #[test]
    fn test_instruction_mentions_ocr() {
        assert!(INSTRUCTION_PROMPT.contains("Optical Character Recognition"));
    }

    #[test]
    fn test_instruction_keeps_typographic_apostrophe() {
        assert!(INSTRUCTION_PROMPT.contains("directly addresses the user\u{2019}s query."));
        assert!(INSTRUCTION_PROMPT.contains("Here's how you should handle the process:"));
        assert!(INSTRUCTION_PROMPT.contains("match the user's input."));
    }
}
