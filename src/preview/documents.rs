//! Fixed documents for the rendering surface when no compiled preview is shown.

const MESSAGE_STYLE: &str = "body {
    font-family: Arial, sans-serif;
    background-color: #f5f5f5;
    color: #333;
    display: flex;
    justify-content: center;
    align-items: center;
    height: 100vh;
    margin: 0;
    text-align: center;
}
.message {
    padding: 20px;
    border: 1px solid #ddd;
    border-radius: 5px;
    background-color: white;
    box-shadow: 0 2px 5px rgba(0,0,0,0.1);
    max-width: 80%;
}";

const ERROR_STYLE: &str = "body {
    font-family: Arial, sans-serif;
    background-color: #2d2d30;
    color: #e1e1e1;
    padding: 20px;
    margin: 0;
}
.error {
    background-color: rgba(255, 0, 0, 0.1);
    border-left: 4px solid #ff6b6b;
    padding: 10px;
    margin-bottom: 10px;
    border-radius: 0 4px 4px 0;
}
pre {
    background-color: #1e1e1e;
    padding: 10px;
    border-radius: 4px;
    overflow: auto;
}";

fn message_document(heading: &str, detail: &str) -> String {
    format!(
        "<html>\n<head>\n<style>\n{MESSAGE_STYLE}\n</style>\n</head>\n<body>\n\
         <div class=\"message\">\n<h2>{heading}</h2>\n<p>{detail}</p>\n</div>\n</body>\n</html>\n"
    )
}

/// Shown when the project has no HTML file to preview.
pub fn no_preview_document() -> String {
    message_document(
        "No HTML file to preview",
        "Open or create an HTML file to see it here",
    )
}

/// Shown while automatic preview is switched off.
pub fn paused_document() -> String {
    message_document(
        "Preview is paused",
        "Turn automatic preview back on to see your changes",
    )
}

/// Shown when the rendering surface could not display a compiled document. Both parts are
/// escaped.
pub fn error_document(message: &str, detail: &str) -> String {
    format!(
        "<html>\n<head>\n<style>\n{ERROR_STYLE}\n</style>\n</head>\n<body>\n\
         <h2>Preview error</h2>\n<div class=\"error\">\n<p>{}</p>\n<pre>{}</pre>\n</div>\n\
         <p>The HTML file contains an error. Please fix it.</p>\n</body>\n</html>\n",
        html_escape(message),
        html_escape(detail)
    )
}

/// Title of the preview panel.
pub fn preview_title(entry: Option<&str>) -> String {
    match entry {
        Some(path) => format!("Preview: {path}"),
        None => "Preview".to_string(),
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
