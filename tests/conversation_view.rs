//! Browser tests for the conversation view: reconciliation, stale
//! responses, stick-to-bottom scrolling, sending and lifecycle.
//!
//! Views are built over detached-from-layout containers and driven
//! through `begin_*` / `apply_*`, so no request leaves the test page.

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlFormElement, HtmlTextAreaElement};

use social_frontend::chat::{ChatConfig, ConversationView};
use social_frontend::constants::{PARTNER_BADGE_CLASS, PARTNER_USERNAME_ATTR, READ_RECEIPT_CLASS};
use social_frontend::models::{ChatMessage, MessageList, UnreadCount};
use social_frontend::network::FetchError;
use social_frontend::page::PageContext;

wasm_bindgen_test_configure!(run_in_browser);

const ME: u32 = 5;
const PARTNER: u32 = 2;

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn container(doc: &Document, style: &str) -> Element {
    let el = doc.create_element("div").unwrap();
    el.set_class_name("chat");
    el.set_attribute("style", style).unwrap();
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

fn page(partner: &str) -> PageContext {
    PageContext {
        current_user_id: ME,
        current_username: Some("me".into()),
        partner_username: partner.into(),
    }
}

fn view(doc: &Document, container: &Element, partner: &str, form: Option<HtmlFormElement>) -> ConversationView {
    ConversationView::new(doc.clone(), container.clone(), page(partner), form, ChatConfig::default())
}

fn msg(id: u32, sender_id: u32, is_read: bool) -> ChatMessage {
    ChatMessage {
        id,
        body: format!("message {}", id),
        sender_id,
        recipient_id: None,
        is_read,
        created_at: "10:00".into(),
        sender_avatar: None,
    }
}

fn list(messages: Vec<ChatMessage>) -> Result<MessageList, FetchError> {
    Ok(MessageList { messages })
}

fn rows(container: &Element) -> u32 {
    container.query_selector_all("[data-message-id]").unwrap().length()
}

/// Message form posting to `action`, attached to the document.
fn message_form(doc: &Document, action: &str) -> (HtmlFormElement, HtmlTextAreaElement, HtmlButtonElement) {
    let form: HtmlFormElement = doc.create_element("form").unwrap().dyn_into().unwrap();
    form.set_action(action);
    form.set_inner_html(r#"<textarea name="body"></textarea><button type="submit">Send</button>"#);
    doc.body().unwrap().append_child(&form).unwrap();
    let textarea = form.query_selector("textarea").unwrap().unwrap().dyn_into().unwrap();
    let button = form.query_selector("button").unwrap().unwrap().dyn_into().unwrap();
    (form, textarea, button)
}

/// Yield to the event loop until the send button is usable again.
async fn wait_until_enabled(button: &HtmlButtonElement) {
    for _ in 0..200 {
        if !button.disabled() {
            return;
        }
        TimeoutFuture::new(25).await;
    }
    panic!("send button stayed disabled");
}

#[wasm_bindgen_test]
fn read_flip_updates_receipt_without_duplicating() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "receipt-partner", None);

    let first = view.begin_poll();
    let outcome = view
        .apply_poll(first, list(vec![ChatMessage {
            id: 1,
            body: "hi".into(),
            sender_id: PARTNER,
            recipient_id: None,
            is_read: false,
            created_at: "10:00".into(),
            sender_avatar: None,
        }]))
        .unwrap();
    assert_eq!(outcome.appended, 1);
    assert_eq!(rows(&chat), 1);

    let row = chat.query_selector("[data-message-id=\"1\"]").unwrap().unwrap();
    assert!(row.query_selector(".bubble-left").unwrap().is_some());
    assert!(row.query_selector(&format!(".{}", READ_RECEIPT_CLASS)).unwrap().is_none());
    let bubble_before = row.query_selector(".bubble").unwrap().unwrap().outer_html();

    let second = view.begin_poll();
    let mut read = msg(1, PARTNER, true);
    read.body = "hi".into();
    let outcome = view.apply_poll(second, list(vec![read])).unwrap();
    assert_eq!(outcome.appended, 0);
    assert_eq!(outcome.marked_read, 1);
    assert_eq!(rows(&chat), 1);

    assert!(row.query_selector(&format!(".{}", READ_RECEIPT_CLASS)).unwrap().is_some());
    let bubble_after = row.query_selector(".bubble").unwrap().unwrap().outer_html();
    assert_eq!(bubble_before, bubble_after);

    chat.remove();
}

#[wasm_bindgen_test]
fn own_messages_render_on_the_right() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "right-partner", None);

    let seq = view.begin_poll();
    view.apply_poll(seq, list(vec![msg(1, ME, false), msg(2, PARTNER, false)]));
    assert!(chat.query_selector("[data-message-id=\"1\"] .bubble-right").unwrap().is_some());
    assert!(chat.query_selector("[data-message-id=\"2\"] .bubble-left").unwrap().is_some());
    assert_eq!(view.displayed_ids(), vec![1, 2]);

    chat.remove();
}

#[wasm_bindgen_test]
fn stale_poll_is_discarded() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "stale-partner", None);

    let older = view.begin_poll();
    let newer = view.begin_poll();

    assert!(view.apply_poll(newer, list(vec![msg(1, PARTNER, false)])).is_some());
    assert!(view
        .apply_poll(older, list(vec![msg(1, PARTNER, false), msg(2, PARTNER, false)]))
        .is_none());
    assert_eq!(rows(&chat), 1);
    assert_eq!(view.displayed_count(), 1);

    chat.remove();
}

#[wasm_bindgen_test]
fn failed_poll_changes_nothing() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "failing-partner", None);

    let seq = view.begin_poll();
    let err = FetchError::Status { status: 500, status_text: "Internal Server Error".into() };
    assert!(view.apply_poll(seq, Err(err)).is_none());
    assert_eq!(rows(&chat), 0);

    chat.remove();
}

#[wasm_bindgen_test]
fn server_rendered_rows_are_adopted() {
    let doc = document();
    let chat = container(&doc, "");
    chat.set_inner_html(
        r#"<div class="d-flex mb-2" data-message-id="3">
             <div class="ms-2"><div class="bubble bubble-left">old</div>
             <div class="text-muted small mt-1">09:00</div></div>
           </div>"#,
    );
    let view = view(&doc, &chat, "seeded-partner", None);
    assert_eq!(view.displayed_ids(), vec![3]);

    let seq = view.begin_poll();
    let outcome = view
        .apply_poll(seq, list(vec![msg(3, ME, true), msg(4, PARTNER, false)]))
        .unwrap();
    assert_eq!(outcome.appended, 1);
    assert_eq!(outcome.marked_read, 1);
    assert_eq!(rows(&chat), 2);

    chat.remove();
}

#[wasm_bindgen_test]
fn append_sticks_to_bottom_only_when_already_there() {
    let doc = document();
    let style = "height:100px;overflow-y:auto";
    let initial: Vec<ChatMessage> = (1..=20).map(|id| msg(id, PARTNER, false)).collect();

    // Scrolled to the end: the new message is brought into view.
    let chat = container(&doc, style);
    let v = view(&doc, &chat, "bottom-partner", None);
    let seq = v.begin_poll();
    v.apply_poll(seq, list(initial.clone()));
    chat.set_scroll_top(chat.scroll_height());
    let seq = v.begin_poll();
    let mut more = initial.clone();
    more.push(msg(21, PARTNER, false));
    let outcome = v.apply_poll(seq, list(more.clone())).unwrap();
    assert!(outcome.stuck_to_bottom);
    assert!(chat.scroll_height() - chat.scroll_top() - chat.client_height() < 100);
    chat.remove();

    // Reading older messages: the position is left alone.
    let chat = container(&doc, style);
    let v = view(&doc, &chat, "scrolled-partner", None);
    let seq = v.begin_poll();
    v.apply_poll(seq, list(initial));
    chat.set_scroll_top(0);
    let seq = v.begin_poll();
    let outcome = v.apply_poll(seq, list(more)).unwrap();
    assert_eq!(outcome.appended, 1);
    assert!(!outcome.stuck_to_bottom);
    assert_eq!(chat.scroll_top(), 0);
    chat.remove();
}

#[wasm_bindgen_test]
fn blank_submit_sends_nothing() {
    let doc = document();
    let chat = container(&doc, "");
    let (form, textarea, button) = message_form(&doc, "/messages/send");
    let view = view(&doc, &chat, "blank-partner", Some(form.clone()));

    textarea.set_value("   \n ");
    assert!(!view.submit());
    assert!(!button.disabled());
    assert_eq!(textarea.value(), "   \n ");
    assert_eq!(rows(&chat), 0);

    form.remove();
    chat.remove();
}

#[wasm_bindgen_test]
fn zero_partner_count_removes_badge() {
    let doc = document();
    let chat = container(&doc, "");
    let link = doc.create_element("a").unwrap();
    link.set_attribute(PARTNER_USERNAME_ATTR, "badge-partner").unwrap();
    link.set_inner_html(&format!(r#"<span class="{}">2</span>"#, PARTNER_BADGE_CLASS));
    doc.body().unwrap().append_child(&link).unwrap();

    let view = view(&doc, &chat, "badge-partner", None);
    let selector = format!(".{}", PARTNER_BADGE_CLASS);

    let tickets = view.begin_badge_refresh();
    assert!(view.apply_partner_unread(tickets.partner, Ok(UnreadCount { unread_count: 7 })));
    assert_eq!(link.query_selector(&selector).unwrap().unwrap().text_content().as_deref(), Some("7"));

    let stale = tickets.partner;
    let tickets = view.begin_badge_refresh();
    assert!(!view.apply_partner_unread(stale, Ok(UnreadCount { unread_count: 9 })));

    assert!(view.apply_partner_unread(tickets.partner, Ok(UnreadCount { unread_count: 0 })));
    assert!(link.query_selector(&selector).unwrap().is_none());

    link.remove();
    chat.remove();
}

#[wasm_bindgen_test]
fn stop_retires_outstanding_requests() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "lifecycle-partner", None);

    assert!(!view.is_running());
    view.start().unwrap();
    assert!(view.is_running());
    view.start().unwrap();

    let in_flight = view.begin_poll();
    let badges = view.begin_badge_refresh();
    view.stop();
    assert!(!view.is_running());

    assert!(view.apply_poll(in_flight, list(vec![msg(1, PARTNER, false)])).is_none());
    assert!(!view.apply_global_unread(badges.global, Ok(UnreadCount { unread_count: 1 })));
    assert_eq!(rows(&chat), 0);

    // A second stop is a no-op.
    view.stop();
    chat.remove();
}

#[wasm_bindgen_test]
async fn send_disables_button_until_the_post_settles() {
    let doc = document();
    let chat = container(&doc, "");
    // The discard port never answers HTTP, so the POST fails.
    let (form, textarea, button) = message_form(&doc, "http://127.0.0.1:9/messages/send");
    let view = view(&doc, &chat, "send-fail-partner", Some(form.clone()));

    textarea.set_value("hello there");
    assert!(view.submit());
    assert!(button.disabled());
    assert!(!view.submit(), "a second submit while sending is ignored");
    assert_eq!(rows(&chat), 0, "nothing is rendered before the next poll");

    wait_until_enabled(&button).await;
    assert_eq!(textarea.value(), "hello there");
    assert_eq!(rows(&chat), 0);

    form.remove();
    chat.remove();
}

#[wasm_bindgen_test]
async fn successful_send_clears_the_input() {
    let doc = document();
    let chat = container(&doc, "");
    let (form, textarea, button) = message_form(&doc, "data:text/plain,ok");
    let view = view(&doc, &chat, "send-ok-partner", Some(form.clone()));

    textarea.set_value("  sent  ");
    assert!(view.submit());
    wait_until_enabled(&button).await;

    assert_eq!(textarea.value(), "");
    assert_eq!(rows(&chat), 0, "the sent message waits for the next poll");

    form.remove();
    chat.remove();
}

#[wasm_bindgen_test]
fn append_triggers_badge_refresh_only_while_running() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "eager-badge-partner", None);

    let seq = view.begin_poll();
    let outcome = view.apply_poll(seq, list(vec![msg(1, PARTNER, false)])).unwrap();
    assert!(!outcome.badges_refreshed);

    view.start().unwrap();
    let seq = view.begin_poll();
    let outcome = view.apply_poll(seq, list(vec![msg(1, PARTNER, false)])).unwrap();
    assert!(!outcome.badges_refreshed, "nothing appended, nothing refreshed");

    let seq = view.begin_poll();
    let outcome = view
        .apply_poll(seq, list(vec![msg(1, PARTNER, false), msg(2, PARTNER, false)]))
        .unwrap();
    assert_eq!(outcome.appended, 1);
    assert!(outcome.badges_refreshed);

    view.stop();
    chat.remove();
}

#[wasm_bindgen_test]
fn start_scrolls_rendered_thread_to_bottom() {
    let doc = document();
    let chat = container(&doc, "height:100px;overflow-y:auto");
    let rendered: String = (1..=20)
        .map(|id| format!(r#"<div data-message-id="{}" style="height:40px">m</div>"#, id))
        .collect();
    chat.set_inner_html(&rendered);
    chat.set_scroll_top(0);

    let view = view(&doc, &chat, "initial-scroll-partner", None);
    view.start().unwrap();
    assert!(chat.scroll_top() > 0);
    assert!(chat.scroll_height() - chat.scroll_top() - chat.client_height() < 100);

    view.stop();
    chat.remove();
}

#[wasm_bindgen_test]
fn slow_polls_are_still_applied() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "slow-partner", None);

    // Each response arrives after the next poll went out.
    let first = view.begin_poll();
    let second = view.begin_poll();
    assert!(view.apply_poll(first, list(vec![msg(1, PARTNER, false)])).is_some());
    let third = view.begin_poll();
    assert!(view
        .apply_poll(second, list(vec![msg(1, PARTNER, false), msg(2, PARTNER, false)]))
        .is_some());
    assert_eq!(rows(&chat), 2);

    assert!(view.apply_poll(third, list(vec![msg(1, PARTNER, true)])).is_some());
    assert!(view.apply_poll(second, list(vec![msg(3, PARTNER, false)])).is_none());
    assert_eq!(rows(&chat), 2);

    chat.remove();
}

#[wasm_bindgen_test]
fn stopped_view_can_be_restarted() {
    let doc = document();
    let chat = container(&doc, "");
    let view = view(&doc, &chat, "restart-partner", None);

    view.start().unwrap();
    view.stop();
    view.start().unwrap();
    assert!(view.is_running());

    let seq = view.begin_poll();
    assert_eq!(view.apply_poll(seq, list(vec![msg(1, PARTNER, false)])).unwrap().appended, 1);

    view.stop();
    chat.remove();
}
