// Terminal rendering of output regions and the modal
use crate::application::output_board::{BoardUpdate, Modal};
use crate::domain::render::{Card, RenderResult};

pub fn content_lines(content: &RenderResult) -> Vec<String> {
    match content {
        RenderResult::Loading => vec!["Loading...".to_string()],
        RenderResult::Message(message) => vec![message.clone()],
        RenderResult::Error(message) => vec![format!("! {}", message)],
        RenderResult::Text { heading, lines } => heading.iter().chain(lines).cloned().collect(),
        RenderResult::Image {
            url,
            alt,
            heading,
            lines,
        } => {
            let mut out: Vec<String> = heading.iter().cloned().collect();
            out.push(format!("[image: {}] {}", alt, url));
            out.extend(lines.iter().cloned());
            out
        }
        RenderResult::Cards(cards) => cards.iter().flat_map(card_lines).collect(),
    }
}

fn card_lines(card: &Card) -> Vec<String> {
    let mut out = vec![format!("- {}", card.title)];
    if let Some(url) = &card.image_url {
        out.push(format!("  [image] {}", url));
    }
    out.extend(card.lines.iter().map(|l| format!("  {}", l)));
    out
}

pub fn format_region(region: &str, content: &RenderResult) -> String {
    let lines = content_lines(content);
    match lines.as_slice() {
        [single] => format!("[{}] {}", region, single),
        _ => {
            let body: Vec<String> = lines.iter().map(|l| format!("    {}", l)).collect();
            format!("[{}]\n{}", region, body.join("\n"))
        }
    }
}

pub fn format_modal(modal: &Modal) -> String {
    let mut out = vec![format!("== {} ==", modal.title)];
    out.extend(content_lines(&modal.content));
    out.push("(close with `close`)".to_string());
    out.join("\n")
}

pub fn format_update(update: &BoardUpdate) -> String {
    match update {
        BoardUpdate::Region { region, content } => format_region(region, content),
        BoardUpdate::ModalOpened(modal) => format_modal(modal),
        BoardUpdate::ModalClosed => "(modal closed)".to_string(),
    }
}
