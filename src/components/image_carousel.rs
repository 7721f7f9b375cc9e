//! Full-size image viewer for post and reply thumbnails.
//!
//! Clicking a `.post-image-thumbnail` fetches every image of its post (or
//! reply), opens `#imageCarouselModal` on the clicked one and lets the user
//! page through them with the arrow buttons or the arrow keys.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlButtonElement, HtmlImageElement, KeyboardEvent};

use crate::chat::RequestSequence;
use crate::constants::{DEFAULT_UPLOAD_TYPE, UPLOADS_PREFIX};
use crate::dom_utils::{by_id_as, closest, non_empty_attr, show};
use crate::models::GalleryImage;
use crate::network::{api_url, ApiClient};
use crate::{debug_log, error_log, warn_log};

const MODAL_ID: &str = "imageCarouselModal";
const THUMBNAIL_SELECTOR: &str = ".post-image-thumbnail";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Modal)]
    type BootstrapModal;

    #[wasm_bindgen(constructor, catch, js_namespace = bootstrap, js_class = "Modal")]
    fn new(element: &Element) -> Result<BootstrapModal, JsValue>;

    #[wasm_bindgen(method)]
    fn show(this: &BootstrapModal);
}

/// Images of one post or reply and the one being shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gallery {
    images: Vec<GalleryImage>,
    index: usize,
}

impl Gallery {
    /// Open on `clicked`. An empty list falls back to the clicked image
    /// alone; an unknown filename starts at the first image.
    pub fn open(images: Vec<GalleryImage>, clicked: &str) -> Self {
        let images = if images.is_empty() && !clicked.is_empty() {
            vec![GalleryImage { filename: clicked.to_string(), order: 0, upload_type: None }]
        } else {
            images
        };
        let index = images.iter().position(|img| img.filename == clicked).unwrap_or(0);
        Self { images, index }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&GalleryImage> {
        self.images.get(self.index)
    }

    /// Path of the current image under the uploads directory.
    pub fn current_path(&self) -> Option<String> {
        self.current().map(|img| {
            let upload_type = img
                .upload_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_UPLOAD_TYPE);
            format!("{}/{}/{}", UPLOADS_PREFIX, upload_type, img.filename)
        })
    }

    /// `"2 / 5"`
    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.index + 1, self.images.len())
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.images.len()
    }

    /// Step back; `false` at the first image.
    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward; `false` at the last image.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.index += 1;
            true
        } else {
            false
        }
    }
}

struct Carousel {
    modal: Element,
    image: HtmlImageElement,
    counter: Option<Element>,
    prev_button: HtmlButtonElement,
    next_button: HtmlButtonElement,
    gallery: RefCell<Gallery>,
    opening: RequestSequence,
}

impl Carousel {
    fn render(&self) {
        let gallery = self.gallery.borrow();
        let Some(path) = gallery.current_path() else {
            return;
        };
        self.image.set_src(&api_url(&path));
        if let Some(counter) = &self.counter {
            counter.set_text_content(Some(&gallery.counter_label()));
        }
        self.prev_button.set_disabled(!gallery.has_prev());
        self.next_button.set_disabled(!gallery.has_next());
    }

    fn step(&self, forward: bool) {
        let moved = {
            let mut gallery = self.gallery.borrow_mut();
            if forward { gallery.next() } else { gallery.prev() }
        };
        if moved {
            debug_log!("[image_carousel] index {}", self.gallery.borrow().index());
            self.render();
        }
    }

    fn show_modal(&self) {
        match BootstrapModal::new(&self.modal) {
            Ok(modal) => modal.show(),
            Err(_) => {
                // Bootstrap's script is not on the page.
                let _ = self.modal.class_list().add_1("show");
                show(&self.modal);
            }
        }
    }

    async fn open(self: Rc<Self>, thumbnail: Element) {
        let clicked = thumbnail.get_attribute("data-image-filename").unwrap_or_default();
        let reply_id = non_empty_attr(&thumbnail, "data-reply-id");
        let post_id = non_empty_attr(&thumbnail, "data-post-id");

        let ticket = self.opening.issue();
        let fetched = match (reply_id, post_id) {
            (Some(id), _) => Some(ApiClient::get_reply_images(&id).await),
            (None, Some(id)) => Some(ApiClient::get_post_images(&id).await),
            (None, None) => None,
        };
        // A later thumbnail click supersedes this one.
        if !self.opening.is_latest(ticket) {
            return;
        }

        let images = match fetched {
            Some(Ok(list)) => list.images,
            Some(Err(e)) => {
                error_log!("[image_carousel] Error fetching images: {}", e);
                Vec::new()
            }
            None => Vec::new(),
        };

        let gallery = Gallery::open(images, &clicked);
        if gallery.is_empty() {
            warn_log!("[image_carousel] nothing to show");
            return;
        }
        debug_log!(
            "[image_carousel] opened with {} images at index {}",
            gallery.len(),
            gallery.index()
        );
        *self.gallery.borrow_mut() = gallery;
        self.render();
        self.show_modal();
    }
}

pub fn setup_image_carousel(document: &Document) -> Result<(), JsValue> {
    let Some(modal) = document.get_element_by_id(MODAL_ID) else {
        return Ok(());
    };
    let (Some(image), Some(prev_button), Some(next_button)) = (
        by_id_as::<HtmlImageElement>(document, "carouselMainImage"),
        by_id_as::<HtmlButtonElement>(document, "prevImageBtn"),
        by_id_as::<HtmlButtonElement>(document, "nextImageBtn"),
    ) else {
        warn_log!("[image_carousel] modal is missing its image or buttons");
        return Ok(());
    };

    let carousel = Rc::new(Carousel {
        modal,
        image,
        counter: document.get_element_by_id("imageCounter"),
        prev_button,
        next_button,
        gallery: RefCell::new(Gallery::default()),
        opening: RequestSequence::new(),
    });

    {
        let carousel = carousel.clone();
        let handler = Closure::wrap(Box::new(move |event: Event| {
            if let Some(thumbnail) = closest(event.target(), THUMBNAIL_SELECTOR) {
                spawn_local(carousel.clone().open(thumbnail));
            }
        }) as Box<dyn FnMut(_)>);
        document.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    for (button, forward) in [
        (carousel.prev_button.clone(), false),
        (carousel.next_button.clone(), true),
    ] {
        let carousel = carousel.clone();
        let handler = Closure::wrap(Box::new(move |_: Event| {
            carousel.step(forward);
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    {
        let carousel = carousel.clone();
        let handler = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if !carousel.modal.class_list().contains("show") {
                return;
            }
            let forward = match event.key().as_str() {
                "ArrowLeft" => false,
                "ArrowRight" => true,
                _ => return,
            };
            event.prevent_default();
            carousel.step(forward);
        }) as Box<dyn FnMut(_)>);
        document.add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    Ok(())
}
