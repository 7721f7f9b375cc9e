use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, HtmlFormElement};

use super::badge;
use super::bubble::{self, render_message};
use super::composer::Composer;
use super::displayed::{DisplayedMessages, ReconcilePlan};
use super::scroll::{is_at_bottom, scroll_to_bottom};
use super::sequence::RequestSequence;
use super::ChatConfig;
use crate::constants::{CHAT_CONTAINER_SELECTOR, MESSAGE_FORM_SELECTOR, MESSAGE_ID_ATTR};
use crate::models::{MessageList, UnreadCount};
use crate::network::{ApiClient, FetchError};
use crate::page::PageContext;
use crate::{debug_log, error_log, warn_log};

/// Result of applying one poll response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub appended: usize,
    pub marked_read: usize,
    /// The view was at the bottom before the pass and was scrolled back there.
    pub stuck_to_bottom: bool,
    /// Something was appended and an unread-badge refresh went out.
    pub badges_refreshed: bool,
}

/// Tickets of one badge refresh (partner and navbar counts are fetched
/// separately and sequenced separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeTickets {
    pub partner: u64,
    pub global: u64,
}

/// The live chat thread of one page.
///
/// Owns its timers and listeners: [`start`](Self::start) arms them,
/// [`stop`](Self::stop) (or dropping the view) tears all of them down.
/// Responses older than one already applied for the same kind of
/// request, or issued before `stop`, are discarded.
pub struct ConversationView {
    inner: Rc<ViewInner>,
}

struct ViewInner {
    config: ChatConfig,
    page: PageContext,
    document: Document,
    container: Element,
    composer: Option<Composer>,
    displayed: RefCell<DisplayedMessages>,
    poll_seq: RequestSequence,
    partner_badge_seq: RequestSequence,
    global_badge_seq: RequestSequence,
    running: Cell<bool>,
    timers: RefCell<Timers>,
    listeners: RefCell<Vec<Listener>>,
}

#[derive(Default)]
struct Timers {
    poll: Option<Interval>,
    badge: Option<Interval>,
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl ConversationView {
    /// Locate the chat container, page identity and message form in
    /// `document`. `Ok(None)` means this page has no conversation view.
    pub fn mount(document: &Document, config: ChatConfig) -> Result<Option<Self>, JsValue> {
        let Some(container) = document.query_selector(CHAT_CONTAINER_SELECTOR)? else {
            return Ok(None);
        };
        let Some(page) = PageContext::from_document(document) else {
            debug_log!("[chat] container present but no partner username, not mounting");
            return Ok(None);
        };
        let form = document
            .query_selector(MESSAGE_FORM_SELECTOR)?
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());

        Ok(Some(Self::new(document.clone(), container, page, form, config)))
    }

    /// Build a view over an explicit container. Messages already rendered
    /// in the container are adopted as displayed.
    pub fn new(
        document: Document,
        container: Element,
        page: PageContext,
        form: Option<HtmlFormElement>,
        config: ChatConfig,
    ) -> Self {
        let inner = ViewInner {
            config,
            page,
            document,
            container,
            composer: form.map(Composer::new),
            displayed: RefCell::new(DisplayedMessages::new()),
            poll_seq: RequestSequence::new(),
            partner_badge_seq: RequestSequence::new(),
            global_badge_seq: RequestSequence::new(),
            running: Cell::new(false),
            timers: RefCell::new(Timers::default()),
            listeners: RefCell::new(Vec::new()),
        };
        inner.seed_from_dom();
        Self { inner: Rc::new(inner) }
    }

    pub fn page(&self) -> &PageContext {
        &self.inner.page
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    pub fn displayed_count(&self) -> usize {
        self.inner.displayed.borrow().len()
    }

    pub fn displayed_ids(&self) -> Vec<u32> {
        self.inner.displayed.borrow().ids().to_vec()
    }

    /// Arm the poll and badge timers, the submit handler and the initial
    /// scroll-to-bottom. Calling it on a running view does nothing.
    pub fn start(&self) -> Result<(), JsValue> {
        let view = &self.inner;
        if view.running.get() {
            return Ok(());
        }
        view.running.set(true);

        scroll_to_bottom(&view.container);
        for delay in view.config.initial_scroll_delays_ms.clone() {
            schedule_once(view, delay, |v| scroll_to_bottom(&v.container));
        }

        let window = crate::dom_utils::window()?;
        listen(view, window.into(), "load", |v, _| scroll_to_bottom(&v.container))?;

        if let Some(composer) = &view.composer {
            let form: EventTarget = composer.form().clone().into();
            listen(view, form, "submit", |v, event| {
                event.prevent_default();
                handle_submit(v);
            })?;
        }

        let weak = Rc::downgrade(view);
        let poll = Interval::new(view.config.poll_interval_ms, move || {
            if let Some(v) = weak.upgrade() {
                poll_now(&v);
            }
        });

        let weak = Rc::downgrade(view);
        let badge_timer = Interval::new(view.config.badge_interval_ms, move || {
            if let Some(v) = weak.upgrade() {
                refresh_badges(&v);
            }
        });

        *view.timers.borrow_mut() = Timers { poll: Some(poll), badge: Some(badge_timer) };
        schedule_once(view, view.config.initial_badge_delay_ms, |v| {
            refresh_badges(v);
        });

        debug_log!(
            "[chat] started for partner {} ({} message(s) on page)",
            view.page.partner_username,
            self.displayed_count()
        );
        Ok(())
    }

    /// Cancel both timers, detach listeners and retire outstanding requests.
    pub fn stop(&self) {
        let view = &self.inner;
        if !view.running.replace(false) {
            return;
        }

        // Dropping the intervals clears them.
        drop(view.timers.take());

        for listener in view.listeners.borrow_mut().drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }

        view.poll_seq.invalidate();
        view.partner_badge_seq.invalidate();
        view.global_badge_seq.invalidate();
        debug_log!("[chat] stopped");
    }

    /// Fetch the thread now instead of waiting for the next tick.
    pub fn poll(&self) {
        poll_now(&self.inner);
    }

    /// Issue a poll ticket without fetching. Paired with
    /// [`apply_poll`](Self::apply_poll) by callers that fetch themselves.
    pub fn begin_poll(&self) -> u64 {
        self.inner.poll_seq.issue()
    }

    /// Apply the response of poll `seq`. Returns `None` when the response
    /// was stale or failed.
    pub fn apply_poll(&self, seq: u64, result: Result<MessageList, FetchError>) -> Option<PollOutcome> {
        apply_poll(&self.inner, seq, result)
    }

    pub fn begin_badge_refresh(&self) -> BadgeTickets {
        BadgeTickets {
            partner: self.inner.partner_badge_seq.issue(),
            global: self.inner.global_badge_seq.issue(),
        }
    }

    /// Apply a partner unread count. Returns `true` if it was applied.
    pub fn apply_partner_unread(&self, seq: u64, result: Result<UnreadCount, FetchError>) -> bool {
        apply_partner_unread(&self.inner, seq, result)
    }

    /// Apply the navbar unread total. Returns `true` if it was applied.
    pub fn apply_global_unread(&self, seq: u64, result: Result<UnreadCount, FetchError>) -> bool {
        apply_global_unread(&self.inner, seq, result)
    }

    /// Run the submit path as if the form had been submitted. Returns
    /// `true` if a request was issued.
    pub fn submit(&self) -> bool {
        handle_submit(&self.inner)
    }
}

impl Drop for ConversationView {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ViewInner {
    fn seed_from_dom(&self) {
        let rows = match self.container.query_selector_all(&format!("[{}]", MESSAGE_ID_ATTR)) {
            Ok(rows) => rows,
            Err(e) => {
                warn_log!("[chat] could not read rendered messages: {:?}", e);
                return;
            }
        };

        let mut displayed = self.displayed.borrow_mut();
        for i in 0..rows.length() {
            let Some(row) = rows.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Some(id) = bubble::message_id(&row) {
                displayed.seed(id, bubble::has_receipt(&row));
            }
        }
    }

    fn row(&self, id: u32) -> Result<Option<Element>, JsValue> {
        self.container
            .query_selector(&format!("[{}=\"{}\"]", MESSAGE_ID_ATTR, id))
    }

    fn at_bottom(&self) -> bool {
        is_at_bottom(&self.container, self.config.at_bottom_threshold_px)
    }
}

// ---------------------------------------------------------------------------
// Poll-and-reconcile
// ---------------------------------------------------------------------------

fn poll_now(view: &Rc<ViewInner>) {
    let seq = view.poll_seq.issue();
    let username = view.page.partner_username.clone();
    let weak = Rc::downgrade(view);

    spawn_local(async move {
        let result = ApiClient::get_messages(&username).await;
        if let Some(view) = weak.upgrade() {
            apply_poll(&view, seq, result);
        }
    });
}

fn apply_poll(
    view: &Rc<ViewInner>,
    seq: u64,
    result: Result<MessageList, FetchError>,
) -> Option<PollOutcome> {
    if !view.poll_seq.accept(seq) {
        debug_log!("[chat] discarding stale poll #{}", seq);
        return None;
    }

    let list = match result {
        Ok(list) => list,
        Err(e) => {
            warn_log!("[chat] poll error: {}", e);
            return None;
        }
    };

    match reconcile(view, &list) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error_log!("[chat] failed to apply poll #{}: {:?}", seq, e);
            None
        }
    }
}

fn reconcile(view: &Rc<ViewInner>, list: &MessageList) -> Result<PollOutcome, JsValue> {
    let was_at_bottom = view.at_bottom();
    let plan = view.displayed.borrow().plan(&list.messages);
    let mut outcome = PollOutcome::default();

    let written = write_plan(view, &plan, &mut outcome);

    if outcome.appended > 0 {
        if was_at_bottom {
            scroll_to_bottom(&view.container);
            // Avatars can still change the height after layout.
            schedule_once(view, view.config.append_scroll_delay_ms, |v| {
                scroll_to_bottom(&v.container)
            });
            outcome.stuck_to_bottom = true;
        }
        outcome.badges_refreshed = refresh_badges(view);
        debug_log!("[chat] appended {} message(s)", outcome.appended);
    }

    written.map(|_| outcome)
}

// An id is committed only once its row (or receipt) is in the container;
// whatever fails here is planned again by the next poll.
fn write_plan(view: &ViewInner, plan: &ReconcilePlan, outcome: &mut PollOutcome) -> Result<(), JsValue> {
    for msg in &plan.appended {
        let row = render_message(&view.document, msg, view.page.current_user_id)?;
        view.container.append_child(&row)?;
        view.displayed.borrow_mut().commit_appended(msg.id, msg.is_read);
        outcome.appended += 1;
    }

    for id in &plan.newly_read {
        let Some(row) = view.row(*id)? else {
            warn_log!("[chat] message {} is tracked but not in the DOM", id);
            continue;
        };
        if bubble::mark_read(&view.document, &row)? {
            outcome.marked_read += 1;
        }
        view.displayed.borrow_mut().commit_read(*id);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unread badges
// ---------------------------------------------------------------------------

/// Fire both unread-count requests. `false` when the view is stopped.
fn refresh_badges(view: &Rc<ViewInner>) -> bool {
    if !view.running.get() {
        return false;
    }

    let partner_seq = view.partner_badge_seq.issue();
    let username = view.page.partner_username.clone();
    let weak = Rc::downgrade(view);
    spawn_local(async move {
        let result = ApiClient::get_partner_unread_count(&username).await;
        if let Some(view) = weak.upgrade() {
            apply_partner_unread(&view, partner_seq, result);
        }
    });

    let global_seq = view.global_badge_seq.issue();
    let weak = Rc::downgrade(view);
    spawn_local(async move {
        let result = ApiClient::get_unread_count().await;
        if let Some(view) = weak.upgrade() {
            apply_global_unread(&view, global_seq, result);
        }
    });
    true
}

fn apply_partner_unread(
    view: &Rc<ViewInner>,
    seq: u64,
    result: Result<UnreadCount, FetchError>,
) -> bool {
    if !view.partner_badge_seq.accept(seq) {
        return false;
    }
    match result {
        Ok(count) => {
            match badge::apply_partner_badge(&view.document, &view.page.partner_username, count.unread_count) {
                Ok(_) => true,
                Err(e) => {
                    error_log!("[chat] failed to update partner badge: {:?}", e);
                    false
                }
            }
        }
        Err(e) => {
            warn_log!("[chat] partner unread count failed: {}", e);
            false
        }
    }
}

fn apply_global_unread(
    view: &Rc<ViewInner>,
    seq: u64,
    result: Result<UnreadCount, FetchError>,
) -> bool {
    if !view.global_badge_seq.accept(seq) {
        return false;
    }
    match result {
        Ok(count) => {
            badge::apply_global_badge(&view.document, count.unread_count);
            true
        }
        Err(e) => {
            warn_log!("[chat] unread count failed: {}", e);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Sending
// ---------------------------------------------------------------------------

fn handle_submit(view: &Rc<ViewInner>) -> bool {
    let Some(composer) = view.composer.clone() else {
        return false;
    };
    if composer.is_busy() {
        return false;
    }
    if composer.pending_body().is_none() {
        return false;
    }

    let form_data = match composer.form_data() {
        Ok(data) => data,
        Err(e) => {
            error_log!("[chat] could not read message form: {:?}", e);
            return false;
        }
    };

    let was_at_bottom = view.at_bottom();
    let action = composer.action();
    let weak = Rc::downgrade(view);
    composer.set_busy(true);

    spawn_local(async move {
        match ApiClient::submit_form(&action, &form_data).await {
            Ok(_) => composer.clear(),
            Err(e) => error_log!("[chat] send failed: {}", e),
        }
        composer.set_busy(false);

        if was_at_bottom {
            if let Some(view) = weak.upgrade() {
                schedule_once(&view, view.config.send_scroll_delay_ms, |v| {
                    scroll_to_bottom(&v.container)
                });
            }
        }
    });

    true
}

// ---------------------------------------------------------------------------
// Timer / listener plumbing
// ---------------------------------------------------------------------------

/// Run `f` once after `delay_ms` if the view is still alive and running.
fn schedule_once<F>(view: &Rc<ViewInner>, delay_ms: u32, f: F)
where
    F: FnOnce(&Rc<ViewInner>) + 'static,
{
    let Some(window) = web_sys::window() else {
        return;
    };
    let weak: Weak<ViewInner> = Rc::downgrade(view);
    let cb = Closure::once_into_js(move || {
        if let Some(view) = weak.upgrade() {
            if view.running.get() {
                f(&view);
            }
        }
    });
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        delay_ms as i32,
    ) {
        warn_log!("[chat] failed to schedule timeout: {:?}", e);
    }
}

/// Attach an event listener that is removed again by `stop`.
fn listen<F>(view: &Rc<ViewInner>, target: EventTarget, event: &'static str, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(&Rc<ViewInner>, Event) + 'static,
{
    let weak = Rc::downgrade(view);
    let callback = Closure::wrap(Box::new(move |e: Event| {
        if let Some(view) = weak.upgrade() {
            handler(&view, e);
        }
    }) as Box<dyn FnMut(Event)>);

    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    view.listeners.borrow_mut().push(Listener { target, event, callback });
    Ok(())
}
