//! Attachment picker of the post composer (`#post-file-input`).
//!
//! A post carries either up to four images or a single video. Selections
//! accumulate across several `change` events; the input's `FileList` is
//! rebuilt after every edit so the form submits exactly what is previewed.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{DataTransfer, Document, Element, File, HtmlInputElement, Url};

use crate::constants::{
    ALERT_IMAGES_ALREADY_SELECTED, ALERT_TOO_MANY_IMAGES, ALERT_TOO_MANY_VIDEOS,
    ALERT_VIDEO_ALREADY_SELECTED, MAX_ATTACHED_IMAGES, PREVIEW_NAME_MAX_GRAPHEMES, REMOVE_LABEL,
    VIDEO_LABEL_PREFIX,
};
use crate::dom_utils::{alert, by_id_as, closest, hide, on_event, show};
use crate::utils::truncate_graphemes;
use crate::{debug_log, error_log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

/// Why a picked file was not attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    VideoAlreadySelected,
    ImagesAlreadySelected,
    TooManyImages,
    TooManyVideos,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Rejection::VideoAlreadySelected => ALERT_VIDEO_ALREADY_SELECTED,
            Rejection::ImagesAlreadySelected => ALERT_IMAGES_ALREADY_SELECTED,
            Rejection::TooManyImages => ALERT_TOO_MANY_IMAGES,
            Rejection::TooManyVideos => ALERT_TOO_MANY_VIDEOS,
        }
    }
}

/// Files attached so far. Generic over the file handle so the rules can be
/// exercised without a browser `File`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSelection<F> {
    images: Vec<F>,
    video: Option<F>,
}

impl<F> Default for MediaSelection<F> {
    fn default() -> Self {
        Self { images: Vec::new(), video: None }
    }
}

impl<F> MediaSelection<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a batch of picked files, in order. Images and a video never
    /// mix, counting files accepted earlier in the same batch. Files of
    /// other types are skipped silently.
    pub fn add(&mut self, batch: impl IntoIterator<Item = (F, MediaKind)>) -> Vec<Rejection> {
        let mut rejections = Vec::new();
        let mut new_images = Vec::new();
        let mut new_video = None;

        for (file, kind) in batch {
            match kind {
                MediaKind::Image => {
                    if self.video.is_some() || new_video.is_some() {
                        rejections.push(Rejection::VideoAlreadySelected);
                    } else if self.images.len() + new_images.len() < MAX_ATTACHED_IMAGES {
                        new_images.push(file);
                    } else {
                        rejections.push(Rejection::TooManyImages);
                    }
                }
                MediaKind::Video => {
                    if !self.images.is_empty() || !new_images.is_empty() {
                        rejections.push(Rejection::ImagesAlreadySelected);
                    } else if self.video.is_none() && new_video.is_none() {
                        new_video = Some(file);
                    } else {
                        rejections.push(Rejection::TooManyVideos);
                    }
                }
                MediaKind::Other => {}
            }
        }

        self.images.extend(new_images);
        if new_video.is_some() {
            self.video = new_video;
        }
        rejections
    }

    pub fn images(&self) -> &[F] {
        &self.images
    }

    pub fn video(&self) -> Option<&F> {
        self.video.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.video.is_none()
    }

    /// Drop the image at `index`; out-of-range indexes are ignored.
    pub fn remove_image(&mut self, index: usize) -> Option<F> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn remove_video(&mut self) -> Option<F> {
        self.video.take()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.video = None;
    }

    /// Everything to submit: images first, then the video.
    pub fn files(&self) -> impl Iterator<Item = &F> {
        self.images.iter().chain(self.video.iter())
    }
}

struct PostMediaPreview {
    document: Document,
    input: HtmlInputElement,
    container: Element,
    images_preview: Element,
    video_preview: Element,
    selection: RefCell<MediaSelection<File>>,
    object_urls: RefCell<Vec<String>>,
}

impl PostMediaPreview {
    fn on_change(&self) {
        let Some(list) = self.input.files() else {
            return;
        };
        let batch: Vec<(File, MediaKind)> = (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|file| {
                let kind = MediaKind::from_mime(&file.type_());
                (file, kind)
            })
            .collect();

        let rejections = self.selection.borrow_mut().add(batch);
        for rejection in rejections {
            alert(rejection.message());
        }
        self.refresh();
    }

    fn refresh(&self) {
        if let Err(e) = self.render() {
            error_log!("[media_preview] failed to render preview: {:?}", e);
        }
        if let Err(e) = self.sync_input() {
            error_log!("[media_preview] failed to rebuild file list: {:?}", e);
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        for url in self.object_urls.borrow_mut().drain(..) {
            let _ = Url::revoke_object_url(&url);
        }
        self.images_preview.set_inner_html("");
        self.video_preview.set_inner_html("");

        let selection = self.selection.borrow();
        for (index, file) in selection.images().iter().enumerate() {
            let url = self.object_url(file)?;
            self.images_preview
                .append_child(&self.image_entry(file, &url, index)?.into())?;
        }
        if let Some(video) = selection.video() {
            let url = self.object_url(video)?;
            self.video_preview.append_child(&self.video_entry(video, &url)?.into())?;
        }

        if selection.is_empty() {
            hide(&self.container);
            self.input.set_value("");
        } else {
            show(&self.container);
        }
        debug_log!(
            "[media_preview] {} images, video={}",
            selection.images().len(),
            selection.video().is_some()
        );
        Ok(())
    }

    fn object_url(&self, file: &File) -> Result<String, JsValue> {
        let url = Url::create_object_url_with_blob(file)?;
        self.object_urls.borrow_mut().push(url.clone());
        Ok(url)
    }

    fn image_entry(&self, file: &File, url: &str, index: usize) -> Result<Element, JsValue> {
        let doc = &self.document;
        let entry = doc.create_element("div")?;
        entry.set_class_name("mb-2");
        let row = doc.create_element("div")?;
        row.set_class_name("d-flex gap-2 align-items-center");

        let img = doc.create_element("img")?;
        img.set_attribute("src", url)?;
        img.set_class_name("img-thumbnail");
        img.set_attribute("style", "width:80px;height:80px;object-fit:cover")?;

        let details = doc.create_element("div")?;
        let name = doc.create_element("p")?;
        name.set_class_name("mb-1 small");
        name.set_text_content(Some(&truncate_graphemes(&file.name(), PREVIEW_NAME_MAX_GRAPHEMES)));
        let remove = doc.create_element("button")?;
        remove.set_attribute("type", "button")?;
        remove.set_class_name("btn btn-sm btn-outline-danger remove-image");
        remove.set_attribute("data-index", &index.to_string())?;
        remove.set_text_content(Some(REMOVE_LABEL));

        details.append_child(&name)?;
        details.append_child(&remove)?;
        row.append_child(&img)?;
        row.append_child(&details)?;
        entry.append_child(&row)?;
        Ok(entry)
    }

    fn video_entry(&self, file: &File, url: &str) -> Result<Element, JsValue> {
        let doc = &self.document;
        let entry = doc.create_element("div")?;
        entry.set_class_name("mb-2");

        let name = doc.create_element("p")?;
        name.set_class_name("mb-2 small");
        let label = format!(
            "{}{}",
            VIDEO_LABEL_PREFIX,
            truncate_graphemes(&file.name(), PREVIEW_NAME_MAX_GRAPHEMES)
        );
        name.set_text_content(Some(&label));

        let video = doc.create_element("video")?;
        video.set_attribute("controls", "")?;
        video.set_attribute("style", "max-width:300px;max-height:240px;border-radius:8px")?;
        let source = doc.create_element("source")?;
        source.set_attribute("src", url)?;
        video.append_child(&source)?;

        let actions = doc.create_element("div")?;
        actions.set_class_name("mt-2");
        let remove = doc.create_element("button")?;
        remove.set_attribute("type", "button")?;
        remove.set_class_name("btn btn-sm btn-outline-danger remove-video");
        remove.set_text_content(Some(REMOVE_LABEL));
        actions.append_child(&remove)?;

        entry.append_child(&name)?;
        entry.append_child(&video)?;
        entry.append_child(&actions)?;
        Ok(entry)
    }

    fn sync_input(&self) -> Result<(), JsValue> {
        let transfer = DataTransfer::new()?;
        let items = transfer.items();
        for file in self.selection.borrow().files() {
            items.add_with_file(file)?;
        }
        self.input.set_files(transfer.files().as_ref());
        Ok(())
    }
}

pub fn setup_media_preview(document: &Document) -> Result<(), JsValue> {
    let Some(input) = by_id_as::<HtmlInputElement>(document, "post-file-input") else {
        return Ok(());
    };
    let (Some(container), Some(images_preview), Some(video_preview)) = (
        document.get_element_by_id("post-media-preview"),
        document.get_element_by_id("post-images-preview"),
        document.get_element_by_id("post-video-preview"),
    ) else {
        return Ok(());
    };

    let preview = Rc::new(PostMediaPreview {
        document: document.clone(),
        input,
        container,
        images_preview,
        video_preview,
        selection: RefCell::new(MediaSelection::new()),
        object_urls: RefCell::new(Vec::new()),
    });

    let p = preview.clone();
    on_event(&preview.input, "change", move |_| p.on_change())?;

    // Remove buttons are re-created on every render, so listen on their
    // containers instead.
    let p = preview.clone();
    on_event(&preview.images_preview, "click", move |event| {
        let Some(button) = closest(event.target(), ".remove-image") else {
            return;
        };
        event.prevent_default();
        let index = button
            .get_attribute("data-index")
            .and_then(|i| i.parse::<usize>().ok());
        if let Some(index) = index {
            p.selection.borrow_mut().remove_image(index);
            p.refresh();
        }
    })?;

    let p = preview.clone();
    on_event(&preview.video_preview, "click", move |event| {
        if closest(event.target(), ".remove-video").is_some() {
            event.prevent_default();
            p.selection.borrow_mut().remove_video();
            p.refresh();
        }
    })?;

    if let Some(remove_all) = document.get_element_by_id("post-remove-media") {
        let p = preview.clone();
        on_event(&remove_all, "click", move |event| {
            event.prevent_default();
            p.selection.borrow_mut().clear();
            p.refresh();
        })?;
    }

    Ok(())
}
