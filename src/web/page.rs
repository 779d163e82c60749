//! The chat page.

use askama::Template;

use crate::types::MessageParam;

/// Browser tab and heading text.
pub const TITLE: &str = "Reframe IT";
/// Favicon glyph.
pub const ICON: &str = "🌿";
/// Line under the heading.
pub const SUBTITLE: &str = "Turn your Negative thoughts into positive";
/// Small print under the subtitle.
pub const CAPTION: &str = "Amity Center of Happiness by Rekhi Foundation";
/// Placeholder in the text entry.
pub const PLACEHOLDER: &str = "How can I help you with your wellness today?";
/// Shown while a submission is awaiting its reply.
pub const THINKING: &str = "Thinking Naturally ....";

/// The whole page: headings, the transcript in order, an optional inline error, and the form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct ChatPage<'a> {
    title: &'a str,
    icon: &'a str,
    subtitle: &'a str,
    caption: &'a str,
    placeholder: &'a str,
    thinking: &'a str,
    messages: &'a [MessageParam],
    error: Option<String>,
}

impl<'a> ChatPage<'a> {
    /// A page showing `messages` and, when a turn just failed, `error`.
    pub fn new(messages: &'a [MessageParam], error: Option<String>) -> Self {
        Self {
            title: TITLE,
            icon: ICON,
            subtitle: SUBTITLE,
            caption: CAPTION,
            placeholder: PLACEHOLDER,
            thinking: THINKING,
            messages,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_has_headings() {
        let html = ChatPage::new(&[], None).render().unwrap();
        assert!(html.contains("<title>Reframe IT</title>"));
        assert!(html.contains(SUBTITLE));
        assert!(html.contains(CAPTION));
        assert!(html.contains(PLACEHOLDER));
        assert!(html.contains(ICON));
        assert!(html.contains(THINKING));
        assert!(!html.contains("class=\"message "));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn transcript_in_insertion_order() {
        let messages = vec![
            MessageParam::user("first thought"),
            MessageParam::assistant("first reply"),
            MessageParam::user("second thought"),
            MessageParam::assistant("second reply"),
        ];
        let html = ChatPage::new(&messages, None).render().unwrap();
        let positions: Vec<usize> = messages
            .iter()
            .map(|m| html.find(m.content.as_str()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches("class=\"message user\"").count(), 2);
        assert_eq!(html.matches("class=\"message assistant\"").count(), 2);
    }

    #[test]
    fn content_is_escaped() {
        let messages = vec![MessageParam::user("<script>alert(1)</script>")];
        let html = ChatPage::new(&messages, None).render().unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn error_shown_inline() {
        let messages = vec![MessageParam::user("Nobody likes me.")];
        let html = ChatPage::new(&messages, Some("Connection error: refused".to_string()))
            .render()
            .unwrap();
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("Connection error: refused"));
        assert!(html.find("Nobody likes me.").unwrap() < html.find("role=\"alert\"").unwrap());
    }
}
