// Server-rendered single page
// Author: kelexine (https://github.com/kelexine)

use crate::utils::html::escape;
use crate::vision::ACCEPTED_UPLOAD_TYPES;

pub const PAGE_TITLE: &str = "Gemini Image Text Extraction";
pub const HEADING: &str = "Gemini Image-Based Application";
pub const QUERY_LABEL: &str = "Enter text to extract from image";
pub const UPLOAD_LABEL: &str = "Upload the image here";
pub const SUBMIT_LABEL: &str = "Explain the image 👇";
pub const RESPONSE_HEADING: &str = "The response is:";
pub const ERROR_PREFIX: &str = "An error occurred: ";

/// What the output area shows after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Response(String),
    Error(String),
}

/// Everything the page needs to render.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    /// Last query, echoed back into the text input.
    pub query: String,
    /// `data:` URL of the last upload.
    pub preview: Option<String>,
    pub outcome: Option<Outcome>,
}

const STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #1f2937; }
label { display: block; font-weight: 600; margin: 1rem 0 0.4rem; }
input[type=text] { width: 100%; padding: 0.5rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: 0.5rem 1rem; cursor: pointer; }
#preview { display: block; max-width: 100%; margin-top: 1rem; }
figcaption { color: #6b7280; font-size: 0.85rem; }
.response { white-space: pre-wrap; line-height: 1.6; }
.error { background: #fee2e2; color: #991b1b; padding: 0.75rem 1rem; border-radius: 0.4rem; }
</style>"#;

const SCRIPT: &str = r#"<script>
document.getElementById('image').addEventListener('change', function (event) {
  var file = event.target.files[0];
  var preview = document.getElementById('preview');
  var figure = document.getElementById('preview-area');
  if (!file) { figure.hidden = true; return; }
  var reader = new FileReader();
  reader.onload = function (e) { preview.src = e.target.result; figure.hidden = false; };
  reader.readAsDataURL(file);
});
</script>"#;

/// Render the full page.
pub fn render(view: &PageView) -> String {
    let mut html = String::with_capacity(4096 + view.preview.as_ref().map_or(0, String::len));

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(PAGE_TITLE)));
    html.push_str(STYLE);
    html.push_str("\n</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(HEADING)));

    html.push_str("<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n");
    html.push_str(&format!(
        "<label for=\"input\">{}</label>\n<input type=\"text\" id=\"input\" name=\"input\" value=\"{}\">\n",
        escape(QUERY_LABEL),
        escape(&view.query)
    ));
    html.push_str(&format!(
        "<label for=\"image\">{}</label>\n<input type=\"file\" id=\"image\" name=\"image\" accept=\"{}\">\n",
        escape(UPLOAD_LABEL),
        ACCEPTED_UPLOAD_TYPES
    ));
    html.push_str(&render_preview(view.preview.as_deref()));
    html.push_str(&format!("<button type=\"submit\">{}</button>\n</form>\n", escape(SUBMIT_LABEL)));

    html.push_str("<section id=\"output\">\n");
    match &view.outcome {
        Some(Outcome::Response(text)) => {
            html.push_str(&format!(
                "<h3>{}</h3>\n<div class=\"response\">{}</div>\n",
                escape(RESPONSE_HEADING),
                escape(text)
            ));
        }
        Some(Outcome::Error(message)) => {
            html.push_str(&format!(
                "<div class=\"error\" role=\"alert\">{}{}</div>\n",
                escape(ERROR_PREFIX),
                escape(message)
            ));
        }
        None => {}
    }
    html.push_str("</section>\n");

    html.push_str(SCRIPT);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn render_preview(data_url: Option<&str>) -> String {
    match data_url {
        Some(src) => format!(
            "<figure id=\"preview-area\"><img id=\"preview\" src=\"{}\" alt=\"Uploaded Image\"><figcaption>Uploaded Image</figcaption></figure>\n",
            escape(src)
        ),
        None => "<figure id=\"preview-area\" hidden><img id=\"preview\" alt=\"Uploaded Image\"><figcaption>Uploaded Image</figcaption></figure>\n".to_string(),
    }
}
