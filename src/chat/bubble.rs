// Rendering of a single chat bubble.
//
// Markup mirrors the server-rendered thread template so polled and
// server-rendered messages look the same:
//
//   <div class="d-flex mb-2 [justify-content-end]" data-message-id="…">
//     [avatar] <div class="ms-2|me-2 text-end">
//                <div class="bubble bubble-left|bubble-right">body</div>
//                <div class="text-muted small mt-1 message-meta">time [✓✓]</div>
//              </div> [avatar]
//   </div>

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::constants::{
    MESSAGE_ID_ATTR, MESSAGE_META_CLASS, READ_RECEIPT_CLASS, READ_RECEIPT_MARK, UPLOADS_PREFIX,
};
use crate::models::ChatMessage;
use crate::network::api_url;
use crate::utils::format_timestamp;

const AVATAR_STYLE: &str = "width:36px;height:36px;object-fit:cover";
const COLUMN_STYLE: &str = "max-width:70%";
// Templates predating `message-meta` only carry the utility classes.
const LEGACY_META_SELECTOR: &str = ".text-muted.small";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleSide {
    /// Sent by the partner.
    Left,
    /// Sent by the viewer.
    Right,
}

impl BubbleSide {
    pub fn for_message(msg: &ChatMessage, current_user_id: u32) -> Self {
        if msg.sender_id == current_user_id {
            BubbleSide::Right
        } else {
            BubbleSide::Left
        }
    }

    pub fn row_class(self) -> &'static str {
        match self {
            BubbleSide::Left => "d-flex mb-2",
            BubbleSide::Right => "d-flex mb-2 justify-content-end",
        }
    }

    pub fn column_class(self) -> &'static str {
        match self {
            BubbleSide::Left => "ms-2",
            BubbleSide::Right => "me-2 text-end",
        }
    }

    pub fn bubble_class(self) -> &'static str {
        match self {
            BubbleSide::Left => "bubble bubble-left",
            BubbleSide::Right => "bubble bubble-right",
        }
    }
}

/// Build the row element for `msg`. The body is inserted as text, so the
/// DOM does the escaping.
pub fn render_message(
    document: &Document,
    msg: &ChatMessage,
    current_user_id: u32,
) -> Result<Element, JsValue> {
    let side = BubbleSide::for_message(msg, current_user_id);

    let row = document.create_element("div")?;
    row.set_class_name(side.row_class());
    row.set_attribute(MESSAGE_ID_ATTR, &msg.id.to_string())?;

    let column = document.create_element("div")?;
    column.set_class_name(side.column_class());
    column.set_attribute("style", COLUMN_STYLE)?;

    let bubble = document.create_element("div")?;
    bubble.set_class_name(side.bubble_class());
    bubble.set_text_content(Some(&msg.body));

    let meta = document.create_element("div")?;
    meta.set_class_name(&format!("text-muted small mt-1 {}", MESSAGE_META_CLASS));
    meta.set_text_content(Some(&format_timestamp(&msg.created_at)));
    if msg.is_read {
        meta.append_child(&receipt(document)?.into())?;
    }

    column.append_child(&bubble)?;
    column.append_child(&meta)?;

    let avatar = avatar(document, msg.sender_avatar.as_deref())?;
    match side {
        BubbleSide::Left => {
            row.append_child(&avatar)?;
            row.append_child(&column)?;
        }
        BubbleSide::Right => {
            row.append_child(&column)?;
            row.append_child(&avatar)?;
        }
    }

    Ok(row)
}

/// Switch on the receipt marker of an existing row. Only the meta line is
/// touched. Returns `false` when the marker was already present or the row
/// has no meta line to put it in.
pub fn mark_read(document: &Document, row: &Element) -> Result<bool, JsValue> {
    if has_receipt(row) {
        return Ok(false);
    }
    let meta = match row.query_selector(&format!(".{}", MESSAGE_META_CLASS))? {
        Some(meta) => meta,
        None => match row.query_selector(LEGACY_META_SELECTOR)? {
            Some(meta) => meta,
            None => return Ok(false),
        },
    };
    meta.append_child(&receipt(document)?.into())?;
    Ok(true)
}

pub fn has_receipt(row: &Element) -> bool {
    matches!(row.query_selector(&format!(".{}", READ_RECEIPT_CLASS)), Ok(Some(_)))
}

pub fn message_id(row: &Element) -> Option<u32> {
    row.get_attribute(MESSAGE_ID_ATTR)?.trim().parse().ok()
}

fn receipt(document: &Document) -> Result<Element, JsValue> {
    let mark = document.create_element("span")?;
    mark.set_class_name(&format!("ms-1 text-info {}", READ_RECEIPT_CLASS));
    mark.set_text_content(Some(READ_RECEIPT_MARK));
    Ok(mark)
}

fn avatar(document: &Document, filename: Option<&str>) -> Result<Element, JsValue> {
    let wrapper = document.create_element("div")?;
    match filename.filter(|f| !f.is_empty()) {
        Some(file) => {
            let img = document.create_element("img")?;
            img.set_attribute("src", &api_url(&format!("{}/{}", UPLOADS_PREFIX, file)))?;
            img.set_attribute("alt", "")?;
            img.set_class_name("rounded-circle");
            img.set_attribute("style", AVATAR_STYLE)?;
            wrapper.append_child(&img)?;
        }
        None => {
            let placeholder = document.create_element("div")?;
            placeholder.set_class_name("logo");
            placeholder.set_attribute("style", "width:36px;height:36px")?;
            wrapper.append_child(&placeholder)?;
        }
    }
    Ok(wrapper)
}
