//! Single-file previews (feed image/video pickers, avatar pickers) and the
//! "delete avatar" toggles of the profile forms.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, Url};

use crate::constants::{AVATAR_DELETE_LABEL, AVATAR_UNDO_DELETE_LABEL};
use crate::debug_log;
use crate::dom_utils::{by_id_as, hide, on_event, reset_display, show};

/// Hidden inputs telling the server to drop the stored avatar.
const REMOVE_FLAG_IDS: [&str; 2] = ["remove_avatar_input_modal", "remove_avatar_input_settings"];
/// Blocks showing the stored avatar while no new file is picked.
const CURRENT_AVATAR_BLOCK_IDS: [&str; 2] = ["current-avatar-block-modal", "current-avatar-block-settings"];

/// Ids of a file input and its preview widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewIds {
    pub input: &'static str,
    pub preview: &'static str,
    pub media: &'static str,
    pub remove: &'static str,
}

pub const SINGLE_PREVIEWS: [PreviewIds; 4] = [
    PreviewIds {
        input: "post-image-input",
        preview: "post-image-preview",
        media: "post-preview-img",
        remove: "post-remove-image",
    },
    PreviewIds {
        input: "post-video-input",
        preview: "post-video-preview",
        media: "post-preview-video",
        remove: "post-remove-video",
    },
    PreviewIds {
        input: "register-avatar-input",
        preview: "register-avatar-preview",
        media: "register-avatar-img",
        remove: "register-avatar-remove",
    },
    PreviewIds {
        input: "settings-avatar-input",
        preview: "settings-avatar-preview",
        media: "settings-avatar-img",
        remove: "settings-avatar-remove",
    },
];

/// State of a "delete avatar" toggle, stored as the hidden input's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarRemoval {
    Kept,
    Marked,
}

impl AvatarRemoval {
    pub fn from_flag(value: &str) -> Self {
        if value == "1" {
            AvatarRemoval::Marked
        } else {
            AvatarRemoval::Kept
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AvatarRemoval::Kept => AvatarRemoval::Marked,
            AvatarRemoval::Marked => AvatarRemoval::Kept,
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            AvatarRemoval::Kept => "",
            AvatarRemoval::Marked => "1",
        }
    }

    /// Caption offering the opposite action.
    pub fn button_label(self) -> &'static str {
        match self {
            AvatarRemoval::Kept => AVATAR_DELETE_LABEL,
            AvatarRemoval::Marked => AVATAR_UNDO_DELETE_LABEL,
        }
    }

    /// (class to drop, class to add) on the toggle button.
    pub fn button_classes(self) -> (&'static str, &'static str) {
        match self {
            AvatarRemoval::Kept => ("btn-danger", "btn-outline-danger"),
            AvatarRemoval::Marked => ("btn-outline-danger", "btn-danger"),
        }
    }
}

fn first_file(input: &HtmlInputElement) -> Option<web_sys::File> {
    input.files().and_then(|list| list.get(0))
}

fn clear_remove_flags(document: &Document) {
    for id in REMOVE_FLAG_IDS {
        if let Some(flag) = by_id_as::<HtmlInputElement>(document, id) {
            flag.set_value("");
        }
    }
}

fn set_current_avatar_visible(document: &Document, visible: bool) {
    for id in CURRENT_AVATAR_BLOCK_IDS {
        if let Some(block) = document.get_element_by_id(id) {
            if visible {
                reset_display(&block);
            } else {
                hide(&block);
            }
        }
    }
}

/// Wire one input to its preview. Missing preview pieces are tolerated.
pub fn bind_single_preview(document: &Document, ids: PreviewIds) -> Result<bool, JsValue> {
    let Some(input) = by_id_as::<HtmlInputElement>(document, ids.input) else {
        return Ok(false);
    };
    let preview = document.get_element_by_id(ids.preview);
    let media = document.get_element_by_id(ids.media);

    {
        let target: Element = input.clone().into();
        let input = input.clone();
        let preview = preview.clone();
        let media = media.clone();
        on_event(&target, "change", move |_| {
            let Some(file) = first_file(&input) else {
                if let Some(preview) = &preview {
                    hide(preview);
                }
                return;
            };
            if let (Some(media), Ok(url)) = (&media, Url::create_object_url_with_blob(&file)) {
                let _ = media.set_attribute("src", &url);
            }
            if let Some(preview) = &preview {
                show(preview);
            }
        })?;
    }

    if let Some(remove) = document.get_element_by_id(ids.remove) {
        on_event(&remove, "click", move |_| {
            input.set_value("");
            if let Some(media) = &media {
                let _ = media.remove_attribute("src");
            }
            if let Some(preview) = &preview {
                hide(preview);
            }
        })?;
    }
    Ok(true)
}

/// `.avatar-input[data-preview-target]`: preview in the target block,
/// hiding the stored avatar meanwhile.
pub fn bind_avatar_input(document: &Document, input: HtmlInputElement) -> Result<(), JsValue> {
    let preview = input
        .get_attribute("data-preview-target")
        .filter(|id| !id.is_empty())
        .and_then(|id| document.get_element_by_id(&id));
    let img = preview
        .as_ref()
        .and_then(|p| p.query_selector("img").ok().flatten());
    let remove = preview
        .as_ref()
        .and_then(|p| p.query_selector("button").ok().flatten());

    {
        let target: Element = input.clone().into();
        let document = document.clone();
        let input = input.clone();
        let preview = preview.clone();
        let img = img.clone();
        on_event(&target, "change", move |_| {
            debug_log!("[avatar_preview] change on #{}", input.id());
            clear_remove_flags(&document);

            let Some(file) = first_file(&input) else {
                if let Some(preview) = &preview {
                    hide(preview);
                }
                return;
            };
            if let (Some(img), Ok(url)) = (&img, Url::create_object_url_with_blob(&file)) {
                let _ = img.set_attribute("src", &url);
                let revoke = Closure::once_into_js(move || {
                    let _ = Url::revoke_object_url(&url);
                });
                if let Some(img) = img.dyn_ref::<web_sys::HtmlElement>() {
                    img.set_onload(Some(revoke.unchecked_ref()));
                }
            }
            if let Some(preview) = &preview {
                show(preview);
            }
            set_current_avatar_visible(&document, false);
        })?;
    }

    if let Some(remove) = remove {
        let document = document.clone();
        on_event(&remove, "click", move |_| {
            input.set_value("");
            if let Some(img) = &img {
                let _ = img.remove_attribute("src");
            }
            if let Some(preview) = &preview {
                hide(preview);
            }
            clear_remove_flags(&document);
            set_current_avatar_visible(&document, true);
        })?;
    }
    Ok(())
}

/// Flip the delete mark of one avatar form and update its widgets.
pub fn toggle_avatar_removal(
    document: &Document,
    button: &Element,
    flag: &HtmlInputElement,
    current_img: Option<&Element>,
) -> Result<AvatarRemoval, JsValue> {
    let next = AvatarRemoval::from_flag(&flag.value()).toggled();
    flag.set_value(next.flag());
    button.set_text_content(Some(next.button_label()));
    let (drop, add) = next.button_classes();
    button.class_list().remove_1(drop)?;
    button.class_list().add_1(add)?;

    match next {
        AvatarRemoval::Kept => {
            if let Some(img) = current_img {
                reset_display(img);
            }
        }
        AvatarRemoval::Marked => {
            if let Some(img) = current_img {
                hide(img);
            }
            // A pending replacement would contradict the delete.
            for id in ["user-edit-avatar-preview", "settings-avatar-preview"] {
                if let Some(preview) = document.get_element_by_id(id) {
                    hide(&preview);
                }
            }
            for id in ["user-edit-avatar-input", "settings-avatar-input"] {
                if let Some(input) = by_id_as::<HtmlInputElement>(document, id) {
                    input.set_value("");
                }
            }
        }
    }
    Ok(next)
}

fn bind_removal_toggle(
    document: &Document,
    button_id: &str,
    flag_id: &str,
    current_img_id: &str,
) -> Result<(), JsValue> {
    let (Some(button), Some(flag)) = (
        document.get_element_by_id(button_id),
        by_id_as::<HtmlInputElement>(document, flag_id),
    ) else {
        return Ok(());
    };
    let current_img = document.get_element_by_id(current_img_id);
    let document = document.clone();
    let target = button.clone();
    on_event(&button, "click", move |_| {
        if let Ok(state) = toggle_avatar_removal(&document, &target, &flag, current_img.as_ref()) {
            debug_log!("[avatar_preview] avatar removal now {:?}", state);
        }
    })
}

pub fn setup_avatar_previews(document: &Document) -> Result<(), JsValue> {
    for ids in SINGLE_PREVIEWS {
        bind_single_preview(document, ids)?;
    }

    let inputs = document.query_selector_all(".avatar-input")?;
    for i in 0..inputs.length() {
        if let Some(input) = inputs.item(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok()) {
            bind_avatar_input(document, input)?;
        }
    }

    bind_removal_toggle(
        document,
        "remove_avatar_modal_button",
        "remove_avatar_input_modal",
        "current-avatar-img-modal",
    )?;
    bind_removal_toggle(
        document,
        "remove_avatar_button",
        "remove_avatar_input_settings",
        "current-avatar-img-settings",
    )
}
