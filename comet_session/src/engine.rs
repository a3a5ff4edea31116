// Copyright 2025 the Comet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The session lifecycle manager and the glue between resolver, trail, and host.

use core::fmt;

use comet_caret::{CaretRect, Markers, Resolver};
use comet_frames::FrameScheduler;
use comet_trail::{TrailSurface, paint};
use hashbrown::{HashMap, HashSet};
use kurbo::Size;
use tracing::{debug, info, trace, warn};

use crate::carrier;
use crate::config::{Config, Theme};
use crate::error::{EngineError, Result};
use crate::host::{DocumentId, Host, InputEvent, Overlay, OverlayFlags, SessionId};
use crate::mutation::{self, ModalChange, MutationRecord};
use crate::session::{Session, SessionState};

/// Frames between a document opening and its session being created, so the
/// host's own open animation settles before anything is measured.
pub const INIT_DELAY_FRAMES: u32 = 10;

/// Frames between session creation and the scan for style carriers.
pub const CARRIER_DISCOVERY_FRAMES: u32 = 10;

/// Frames between a content mutation and the resolve it triggers.
pub const SETTLE_FRAMES: u32 = 2;

/// Frames caret animations stay suspended after a position update while
/// trailing is disabled.
pub const ANIMATION_RESTORE_FRAMES: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
enum Task {
    Init(DocumentId),
    Resolve(SessionId),
    LocateCarriers,
    RestoreAnimation(SessionId),
}

impl Task {
    fn targets(&self, id: SessionId) -> bool {
        matches!(self, Self::Resolve(s) | Self::RestoreAnimation(s) if *s == id)
    }
}

/// Drives caret overlays for every open document.
///
/// The engine owns one [`Session`] per document, keyed by [`DocumentId`].
/// Hosts forward their events to it:
///
/// - lifecycle: [`on_layout_ready`](Self::on_layout_ready),
///   [`on_document_open`](Self::on_document_open),
///   [`on_document_close`](Self::on_document_close),
///   [`on_active_view_change`](Self::on_active_view_change),
///   [`on_viewport_resize`](Self::on_viewport_resize);
/// - input: [`handle_input`](Self::handle_input);
/// - observers: [`on_content_mutations`](Self::on_content_mutations) and
///   [`on_shell_mutations`](Self::on_shell_mutations);
/// - time: [`frame`](Self::frame), once per animation frame.
///
/// Everything runs on the caller's thread. Work that must wait for the host's
/// layout to settle is queued on a frame scheduler rather than polled.
pub struct CaretEngine<H: Host> {
    host: H,
    config: Config,
    theme: Theme,
    resolver: Resolver,
    sessions: HashMap<DocumentId, Session<H>>,
    retired: HashSet<DocumentId>,
    next_slot: u32,
    active: Option<DocumentId>,
    frames: FrameScheduler<Task>,
    caret_carrier: Option<H::Style>,
    block_carrier: Option<H::Style>,
    shell: Option<H::ShellObserver>,
    modal_open: bool,
    settings_just_closed: bool,
}

impl<H: Host> fmt::Debug for CaretEngine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaretEngine")
            .field("config", &self.config)
            .field("theme", &self.theme)
            .field("sessions", &self.sessions.len())
            .field("active", &self.active)
            .field("pending_frames", &self.frames.len())
            .field("carrier_located", &self.caret_carrier.is_some())
            .field("modal_open", &self.modal_open)
            .finish_non_exhaustive()
    }
}

impl<H: Host> CaretEngine<H> {
    /// Create an engine with the default structural markers.
    pub fn new(host: H, config: Config) -> Self {
        Self::with_markers(host, config, Markers::default())
    }

    /// Create an engine that recognizes host structure through `markers`.
    pub fn with_markers(host: H, config: Config, markers: Markers) -> Self {
        Self {
            host,
            config,
            theme: Theme::default(),
            resolver: Resolver::new(markers),
            sessions: HashMap::new(),
            retired: HashSet::new(),
            next_slot: 0,
            active: None,
            frames: FrameScheduler::new(),
            caret_carrier: None,
            block_carrier: None,
            shell: None,
            modal_open: false,
            settings_just_closed: false,
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration. The caller persists it.
    ///
    /// Live trails are clamped to the new step count.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        for session in self.sessions.values_mut() {
            session.trail.clamp(config.trail_step);
        }
        debug!(?config, "configuration updated");
        self.config = config;
        Ok(())
    }

    /// Current color scheme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch between the light and dark trail colors.
    pub fn on_theme_change(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Structural markers in use.
    pub fn markers(&self) -> &Markers {
        self.resolver.markers()
    }

    /// The document whose editor is active, if any.
    pub fn active_document(&self) -> Option<&DocumentId> {
        self.active.as_ref()
    }

    /// The live session for `document`.
    pub fn session(&self, document: &DocumentId) -> Option<&Session<H>> {
        self.sessions.get(document)
    }

    /// The live session in slot `id`.
    pub fn session_by_id(&self, id: SessionId) -> Result<&Session<H>> {
        self.sessions
            .values()
            .find(|s| s.id == id)
            .ok_or(EngineError::UnknownSession(id))
    }

    /// Every live session, in no particular order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session<H>> {
        self.sessions.values()
    }

    /// Lifecycle state of the slot for `document`.
    pub fn session_state(&self, document: &DocumentId) -> SessionState {
        if self.sessions.contains_key(document) {
            SessionState::Initialized
        } else if self.retired.contains(document) {
            SessionState::TornDown
        } else {
            SessionState::Uninitialized
        }
    }

    /// Whether a modal dialog currently covers the application.
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Whether the caret style carrier has been found.
    pub fn carriers_located(&self) -> bool {
        self.caret_carrier.is_some()
    }

    /// The host finished its initial layout.
    pub fn on_layout_ready(&mut self, active: Option<DocumentId>) {
        self.active = active.clone();
        if let Some(document) = active {
            self.try_init(&document);
        }
    }

    /// A document became active in some pane, or the last one closed (`None`).
    ///
    /// The document's previous session and every session whose document is no
    /// longer open are torn down. The new session is created a few frames
    /// later, from scratch.
    pub fn on_document_open(&mut self, document: Option<DocumentId>) {
        self.frames.retain(|t| !matches!(t, Task::Init(_)));
        let Some(document) = document else {
            let all: Vec<_> = self.sessions.keys().cloned().collect();
            for d in &all {
                self.teardown(d);
            }
            self.active = None;
            return;
        };

        let open = self.host.open_documents();
        let stale: Vec<_> = self
            .sessions
            .keys()
            .filter(|d| **d == document || !open.contains(d))
            .cloned()
            .collect();
        for d in &stale {
            self.teardown(d);
        }
        for session in self.sessions.values_mut() {
            session.hide();
        }
        self.active = Some(document.clone());
        self.frames.schedule(Task::Init(document), INIT_DELAY_FRAMES);
    }

    /// A document was closed.
    pub fn on_document_close(&mut self, document: &DocumentId) {
        self.frames.cancel(&Task::Init(document.clone()));
        self.teardown(document);
        if self.active.as_ref() == Some(document) {
            self.active = None;
        }
    }

    /// Focus moved to another view; `None` when it is not a document editor.
    pub fn on_active_view_change(&mut self, document: Option<&DocumentId>) {
        self.active = document.cloned();
        let show = !self.modal_open;
        let mut any_focused = false;
        for session in self.sessions.values_mut() {
            let focused = Some(&session.document) == document;
            session.focused = focused;
            session.flags.set(OverlayFlags::SHOW, focused && show);
            session.apply_flags();
            any_focused |= focused;
        }
        self.host.set_native_caret_hidden(any_focused && show);
    }

    /// The viewport was resized.
    ///
    /// Canvases are resized and the active caret re-resolved without a trail
    /// or a position transition.
    pub fn on_viewport_resize(&mut self, size: Size) {
        for session in self.sessions.values_mut() {
            session.overlay.surface().resize(size);
        }
        let Some(document) = self.active.clone() else {
            return;
        };
        self.apply_caret(&document, true);
    }

    /// Feed an input event from listeners bound to `document`'s editor.
    ///
    /// Returns the caret position if the event led to a valid resolve.
    pub fn handle_input(&mut self, document: &DocumentId, event: InputEvent) -> Option<CaretRect> {
        let session = self.sessions.get_mut(document)?;
        match event {
            InputEvent::PointerDown { x, target_text } => {
                session.mouse_down = true;
                session.drag.press(x, target_text);
                let pos = self.update_caret(document);
                if let Some(session) = self.sessions.get_mut(document) {
                    session.drag.down_y = pos.map_or(0.0, |p| p.y);
                }
                pos
            }
            InputEvent::PointerMove { x, target_text } => {
                if !session.mouse_down {
                    return None;
                }
                session.drag.drag_over(x, target_text);
                let pos = self.update_caret(document);
                if let Some(session) = self.sessions.get_mut(document) {
                    session.drag.move_y = pos.map_or(0.0, |p| p.y);
                }
                pos
            }
            InputEvent::PointerUp => {
                session.mouse_down = false;
                self.update_caret(document)
            }
            InputEvent::Scroll => self.apply_caret(document, true),
            InputEvent::KeyDown
            | InputEvent::KeyUp
            | InputEvent::CompositionStart
            | InputEvent::CompositionUpdate
            | InputEvent::CompositionEnd => self.update_caret(document),
        }
    }

    /// Feed a batch from the content observer bound to `document`'s editor.
    ///
    /// Structural changes schedule a resolve a couple of frames out; bursts
    /// coalesce into one.
    pub fn on_content_mutations(&mut self, document: &DocumentId, records: &[MutationRecord]) {
        if !mutation::content_changed(records, self.resolver.markers()) {
            return;
        }
        let Some(session) = self.sessions.get_mut(document) else {
            return;
        };
        session.dom_changed = true;
        self.frames.schedule(Task::Resolve(session.id), SETTLE_FRAMES);
    }

    /// Feed a batch from the application shell observer.
    pub fn on_shell_mutations(&mut self, records: &[MutationRecord]) {
        match mutation::modal_change(records, self.resolver.markers()) {
            Some(ModalChange::Opened) => {
                debug!("modal dialog opened; hiding caret overlay");
                self.modal_open = true;
                self.host.set_native_caret_hidden(false);
                for session in self.sessions.values_mut() {
                    session.hide();
                }
            }
            Some(ModalChange::Closed) => {
                debug!("modal dialog closed; restoring caret overlay");
                self.modal_open = false;
                // Keeps a trail that drains later from revealing the caret
                // before the next resolve places it.
                self.settings_just_closed = true;
                if self.sessions.is_empty() {
                    return;
                }
                self.host.set_native_caret_hidden(true);
                let Some(document) = &self.active else {
                    return;
                };
                if let Some(session) = self.sessions.get_mut(document) {
                    session.focused = true;
                    if !session.trail.is_active() {
                        session.flags.insert(OverlayFlags::SHOW);
                    }
                    session.apply_flags();
                }
            }
            None => {}
        }
    }

    /// Advance one animation frame: run due work, then draw every trail.
    pub fn frame(&mut self) {
        for task in self.frames.advance() {
            self.run_task(task);
        }

        let steps = self.config.trail_step;
        let color = self.config.trail_color_for(self.theme);
        let reveal = !self.settings_just_closed;
        for session in self.sessions.values_mut() {
            // A detached canvas means the host already dropped this overlay.
            if !session.overlay.is_attached() {
                continue;
            }
            let frame = session.trail.tick(steps);
            let drained = paint(session.overlay.surface(), &frame, color);
            if drained && session.focused && reveal {
                session.flags.insert(OverlayFlags::SHOW);
                session.apply_flags();
            }
        }
    }

    /// Resolve `document`'s caret without touching any state.
    ///
    /// Returns [`CaretRect::INVALID`] when the document has no live session.
    pub fn resolve(&self, document: &DocumentId) -> CaretRect {
        match self.sessions.get(document) {
            Some(session) => self.resolve_session(session).0,
            None => CaretRect::INVALID,
        }
    }

    /// Resolve `document`'s caret and apply it to the overlay, the style
    /// carrier, and the trail.
    ///
    /// Skipped (returns `None`) when the document is not active, has no live
    /// session, or the style carrier has not been located yet. An invalid
    /// resolve hides the overlay, seeds nothing, and also returns `None`.
    ///
    /// While a modal dialog is open the carrier and last position still
    /// follow the caret but the overlay stays hidden.
    pub fn update_caret(&mut self, document: &DocumentId) -> Option<CaretRect> {
        self.apply_caret(document, false)
    }

    /// `scrolling` moves the caret without a trail or a position transition,
    /// for this update only.
    fn apply_caret(&mut self, document: &DocumentId, scrolling: bool) -> Option<CaretRect> {
        if self.active.as_ref() != Some(document) {
            return None;
        }
        let Some(caret_style) = self.caret_carrier.clone() else {
            debug!(%document, "style carrier not located yet; skipping resolve");
            return None;
        };
        let session = self.sessions.get(document)?;
        let (pos, is_title) = self.resolve_session(session);
        let glyph = self
            .host
            .block_caret_active()
            .then(|| self.resolver.block_glyph(&self.host, is_title));

        self.settings_just_closed = false;
        let steps = self.config.trail_step;
        let trail_enabled = self.config.enable_trail;
        let modal_open = self.modal_open;
        let session = self.sessions.get_mut(document)?;

        if !pos.is_valid() {
            debug!(%document, "caret unresolvable; hiding overlay");
            session.hide();
            return None;
        }

        if !modal_open {
            session.focused = true;
            session.flags.insert(OverlayFlags::SHOW);
        }
        session.flags.set(OverlayFlags::NO_TRANSITION, scrolling);

        match &glyph {
            Some(Some(g)) => {
                let mut buf = [0_u8; 4];
                session.overlay.set_block_text(g.text.encode_utf8(&mut buf));
            }
            _ => session.overlay.set_block_text(""),
        }

        if trail_enabled
            && !scrolling
            && pos.moved_from(&session.last_pos)
            && session.seed_trail(pos, steps)
        {
            trace!(session = %session.id, trail = ?session.trail.geometry(), "trail seeded");
        }

        if trail_enabled {
            session.flags.remove(OverlayFlags::NO_ANIMATION);
        } else {
            session.flags.insert(OverlayFlags::NO_ANIMATION);
            self.frames
                .schedule(Task::RestoreAnimation(session.id), ANIMATION_RESTORE_FRAMES);
        }

        session.last_pos = pos;
        if modal_open {
            session.flags.remove(OverlayFlags::SHOW);
        }
        session.apply_flags();

        if let (Some(Some(g)), Some(block)) = (&glyph, &self.block_carrier) {
            if let Some(text) = self.host.style_text(block) {
                let text = carrier::write_block_font_size(&text, &g.font_size);
                self.host.set_style_text(block, text);
            }
        }
        if let Some(text) = self.host.style_text(&caret_style) {
            self.host
                .set_style_text(&caret_style, carrier::write_caret(&text, pos));
        }

        trace!(%document, x = pos.x, y = pos.y, height = pos.height, "caret resolved");
        Some(pos)
    }

    /// Create the session for `document` now.
    ///
    /// Idempotent: an existing session is kept and its id returned.
    pub fn init_session(&mut self, document: &DocumentId) -> Result<SessionId> {
        if let Some(session) = self.sessions.get(document) {
            return Ok(session.id);
        }
        let editor = self
            .host
            .editor_for(document)
            .ok_or_else(|| EngineError::MissingHost {
                document: document.clone(),
            })?;

        let id = SessionId(self.next_slot);
        self.next_slot += 1;

        let mut overlay = self.host.create_overlay(&editor, id);
        overlay.surface().resize(self.host.viewport_size());
        let binding = self.host.bind(&editor, id);
        if self.shell.is_none() {
            self.shell = Some(self.host.observe_shell());
        }

        let mut session = Session::new(id, document.clone(), editor, overlay, binding);
        if self.modal_open {
            session.focused = false;
        } else if !self.config.enable_trail {
            session.flags.insert(OverlayFlags::SHOW);
        }
        session.apply_flags();
        self.sessions.insert(document.clone(), session);
        self.retired.remove(document);

        // Styles may have been reloaded since the last scan.
        self.frames
            .schedule(Task::LocateCarriers, CARRIER_DISCOVERY_FRAMES);
        info!(session = %id, %document, "caret session initialized");

        self.update_caret(document);
        if !self.modal_open {
            self.host.set_native_caret_hidden(true);
        }
        Ok(id)
    }

    /// Tear down `document`'s session. Returns `false` if none was live.
    ///
    /// Overlay nodes are removed, listeners and observers disconnected, and
    /// any delayed work for the session dropped. The native caret comes back
    /// once no session is left.
    pub fn teardown(&mut self, document: &DocumentId) -> bool {
        let Some(session) = self.sessions.remove(document) else {
            return false;
        };
        let Session {
            id,
            mut overlay,
            binding,
            ..
        } = session;
        overlay.remove();
        self.host.unbind(binding);
        self.frames.retain(|t| !t.targets(id));
        self.retired.insert(document.clone());
        info!(session = %id, %document, "caret session torn down");

        if self.sessions.is_empty() {
            if let Some(shell) = self.shell.take() {
                self.host.disconnect_shell(shell);
            }
            self.host.set_native_caret_hidden(false);
        }
        true
    }

    /// Tear everything down and give the native caret back.
    pub fn shutdown(&mut self) {
        let all: Vec<_> = self.sessions.keys().cloned().collect();
        for document in &all {
            self.teardown(document);
        }
        if let Some(shell) = self.shell.take() {
            self.host.disconnect_shell(shell);
        }
        self.frames.clear();
        self.active = None;
        self.host.set_native_caret_hidden(false);
        info!("caret engine shut down");
    }

    /// Scan the host's stylesheets for the caret and block-caret carriers.
    ///
    /// Returns `true` if the caret carrier was found.
    pub fn locate_carriers(&mut self) -> bool {
        let markers = self.resolver.markers();
        self.caret_carrier = self.host.find_style(&markers.caret_carrier);
        self.block_carrier = self.host.find_style(&markers.block_carrier);
        let located = self.caret_carrier.is_some();
        debug!(
            located,
            block = self.block_carrier.is_some(),
            "style carriers scanned"
        );
        located
    }

    fn resolve_session(&self, session: &Session<H>) -> (CaretRect, bool) {
        let is_title = self.resolver.is_title_context(&self.host);
        let bounds = self.host.editor_bounds(&session.editor);
        let pos = self
            .resolver
            .resolve(&self.host, bounds, &session.drag, is_title);
        (pos, is_title)
    }

    fn try_init(&mut self, document: &DocumentId) -> Option<SessionId> {
        match self.init_session(document) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(%err, "caret session not created; waiting for the next lifecycle event");
                None
            }
        }
    }

    fn document_of(&self, id: SessionId) -> Option<DocumentId> {
        self.sessions
            .values()
            .find(|s| s.id == id)
            .map(|s| s.document.clone())
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Init(document) => {
                self.try_init(&document);
            }
            Task::Resolve(id) => {
                let Some(document) = self.document_of(id) else {
                    return;
                };
                if let Some(session) = self.sessions.get_mut(&document) {
                    session.dom_changed = false;
                }
                self.update_caret(&document);
            }
            Task::LocateCarriers => {
                self.locate_carriers();
            }
            Task::RestoreAnimation(id) => {
                let Some(document) = self.document_of(id) else {
                    return;
                };
                if let Some(session) = self.sessions.get_mut(&document) {
                    session.flags.remove(OverlayFlags::NO_ANIMATION);
                    session.apply_flags();
                }
            }
        }
    }
}
