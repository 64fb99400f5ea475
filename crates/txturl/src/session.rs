//! One editing session: the document, its undo history, the two debounce
//! timers and the shareable location, driven by edit calls from the host and
//! by [`SessionEvent`]s the session posts to itself.
//!
//! Every edit runs splice → reclassify → redraw → restore selection, then
//! restarts the undo-commit and save timers. Saves are stamped with a
//! sequence number and a finished encode only reaches the location if it is
//! newer than whatever was published last.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use txtcore::codec::CodecError;
use txtcore::cursor::{self, CursorPosition, Selection};
use txtcore::document::split_lines;
use txtcore::splice;
use txtcore::{DocumentStore, LineClassifier, Snapshot, StyleTag, UndoRedoManager};

use crate::codec::Codec;
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::export::Exporter;
use crate::share::{Clipboard, ClipboardContent, Printer, QrEncoder, QrOptions, ShareLocation};
use crate::status_manager::StatusManager;
use crate::surface::EditorSurface;

#[derive(Debug)]
pub enum SessionEvent {
    CommitDue(u64),
    SaveDue(u64),
    Encoded {
        seq: u64,
        result: Result<String, CodecError>,
    },
}

pub struct Session<S: EditorSurface> {
    document: DocumentStore,
    classifier: LineClassifier,
    history: UndoRedoManager,
    surface: S,
    codec: Arc<dyn Codec>,
    location: ShareLocation,
    status: StatusManager,
    exporter: Exporter,
    qr_options: QrOptions,
    tab_width: usize,
    commit_timer: Debouncer,
    save_timer: Debouncer,
    save_seq: u64,
    published_seq: u64,
    in_flight: usize,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<S: EditorSurface> Session<S> {
    pub fn new(surface: S, codec: Arc<dyn Codec>, config: &Config) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            document: DocumentStore::new(),
            classifier: LineClassifier::new(),
            history: UndoRedoManager::with_limit(config.editor.history_limit),
            surface,
            codec,
            location: ShareLocation::new(config.share.base_address.clone()),
            status: StatusManager::new(),
            exporter: Exporter::new(&config.export),
            qr_options: QrOptions::from(&config.qr),
            tab_width: config.editor.tab_width,
            commit_timer: Debouncer::new(config.editor.undo_quiet_period()),
            save_timer: Debouncer::new(config.editor.save_quiet_period()),
            save_seq: 0,
            published_seq: 0,
            in_flight: 0,
            events_tx,
            events_rx,
        };
        session.render();
        session
    }

    pub fn document(&self) -> &DocumentStore {
        &self.document
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn styles(&self) -> &[StyleTag] {
        self.classifier.styles()
    }

    pub fn history(&self) -> &UndoRedoManager {
        &self.history
    }

    pub fn location(&self) -> &ShareLocation {
        &self.location
    }

    pub fn href(&self) -> String {
        self.location.href()
    }

    pub fn status(&self) -> &StatusManager {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusManager {
        &mut self.status
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Cursor as the surface currently reports it.
    pub fn cursor(&self) -> CursorPosition {
        cursor::capture(&self.surface, &self.document)
    }

    /// Populates the document from an inbound token. A token that fails to
    /// decode leaves the empty document in place and raises a warning.
    pub async fn load(&mut self, token: Option<&str>) {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            log::info!("No token supplied, starting with empty document");
            return;
        };

        match self.codec.decode(token).await {
            Ok(text) => {
                self.document.set_from_text(&text);
                self.render();
                self.history
                    .reset(Snapshot::new(self.document.text(), CursorPosition::ORIGIN));
                self.location.set_token(Some(token.to_string()));
                cursor::restore(&mut self.surface, &self.document, self.document.end());
                log::info!(
                    "Loaded document from token ({} lines)",
                    self.document.line_count()
                );
            }
            Err(e) => {
                log::warn!("Failed to decode token: {}", e);
                self.location.set_token(None);
                self.status
                    .set_warning("Could not restore document from link.");
            }
        }
    }

    /// Typed text. May span several lines.
    pub fn insert_text(&mut self, text: &str) {
        let selection = self.active_selection();
        self.splice_selection(selection, &split_lines(text));
    }

    /// Inserts clipboard content. Only plain text is accepted; breaks are
    /// normalised and tabs expanded. Returns whether anything was inserted.
    pub fn paste(&mut self, content: ClipboardContent) -> bool {
        match content {
            ClipboardContent::PlainText(text) => {
                let selection = self.active_selection();
                let lines = splice::text_replacement(&text, self.tab_width);
                self.splice_selection(selection, &lines);
                true
            }
            ClipboardContent::Other(mime) => {
                log::warn!("Rejected paste of non-plain-text content: {}", mime);
                self.status.set_error("Only plain text can be pasted.");
                false
            }
        }
    }

    pub fn tab(&mut self) {
        let selection = self.active_selection();
        self.splice_selection(selection, &splice::tab_replacement(self.tab_width));
    }

    /// Backspace: removes the selection, or the character before a collapsed
    /// cursor. Does nothing at the start of the document.
    pub fn delete_backward(&mut self) {
        let selection = self.active_selection();
        let target = if selection.is_collapsed() {
            splice::extend_backward(self.document.lines(), selection.head)
        } else {
            Some(selection)
        };
        if let Some(target) = target {
            self.splice_selection(target, &[]);
        }
    }

    /// Delete: removes the selection, or the character after a collapsed
    /// cursor. Does nothing at the end of the document.
    pub fn delete_forward(&mut self) {
        let selection = self.active_selection();
        let target = if selection.is_collapsed() {
            splice::extend_forward(self.document.lines(), selection.head)
        } else {
            Some(selection)
        };
        if let Some(target) = target {
            self.splice_selection(target, &[]);
        }
    }

    /// Resets to the single empty line.
    pub fn clear(&mut self) {
        self.document.set_from_text("");
        self.render();
        cursor::restore(&mut self.surface, &self.document, CursorPosition::ORIGIN);
        self.schedule_commit();
        self.schedule_save();
    }

    /// Reverts to the previous snapshot. A pending edit is committed first
    /// so it is the thing undone.
    pub fn undo(&mut self) -> bool {
        self.flush_commit();
        match self.history.undo().cloned() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.flush_commit();
        match self.history.redo().cloned() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    /// Restarts the save quiet period. The token is published once it passes.
    pub fn save(&mut self) {
        self.schedule_save();
    }

    /// Pushes the current state onto the undo stack unless it matches the
    /// top entry.
    pub fn commit(&mut self) -> bool {
        let snapshot = Snapshot::new(self.document.text(), self.cursor());
        self.history.commit(snapshot)
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CommitDue(generation) => {
                if self.commit_timer.fire(generation) {
                    self.commit();
                }
            }
            SessionEvent::SaveDue(generation) => {
                if self.save_timer.fire(generation) {
                    self.start_save();
                }
            }
            SessionEvent::Encoded { seq, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.finish_save(seq, result);
            }
        }
    }

    /// Waits for the next posted event. Hosts feed it to
    /// [`handle_event`](Self::handle_event).
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Handles every event already queued without waiting.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Runs until no timer is armed and no encode is in flight.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            match self.events_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.commit_timer.is_armed() || self.save_timer.is_armed() || self.in_flight > 0
    }

    /// Saves right now instead of waiting for the quiet period and returns
    /// the resulting address.
    pub async fn flush_save(&mut self) -> String {
        self.save_timer.cancel();
        let seq = self.next_save_seq();
        if self.document.is_blank() {
            self.publish(seq, None);
        } else {
            let result = self.codec.encode(&self.document.text()).await;
            self.finish_save(seq, result);
        }
        self.location.href()
    }

    /// Copies the fresh address to the clipboard, or tells the user to copy
    /// it by hand when there is no clipboard.
    pub async fn share(&mut self, clipboard: Option<&mut dyn Clipboard>) -> String {
        let href = self.flush_save().await;
        match clipboard {
            Some(clipboard) => match clipboard.write_text(&href) {
                Ok(()) => self.status.set_info("Link copied!"),
                Err(e) => {
                    log::warn!("Clipboard write failed: {}", e);
                    self.status.set_info("Copy from address bar.");
                }
            },
            None => self.status.set_info("Copy from address bar."),
        }
        href
    }

    /// SVG QR symbol of the fresh address, or `None` with a notice when the
    /// address is too long for a symbol.
    pub async fn qr_code(&mut self, encoder: &dyn QrEncoder) -> Option<String> {
        let href = self.flush_save().await;
        match encoder.render_svg(&href, self.qr_options) {
            Ok(svg) => Some(svg),
            Err(e) => {
                log::warn!("QR generation failed: {}", e);
                self.status.set_error("Text too long for QR code.");
                None
            }
        }
    }

    /// Refreshes the token so the printed address matches the document,
    /// then prints.
    pub async fn print(&mut self, printer: &mut dyn Printer) -> Result<()> {
        let href = self.flush_save().await;
        printer.print(&href)
    }

    pub async fn export(&self, dir: &Path) -> Result<PathBuf> {
        self.exporter.export(dir, &self.document.text()).await
    }

    fn active_selection(&self) -> Selection {
        cursor::capture_selection(&self.surface, &self.document)
            .unwrap_or_else(|| Selection::collapsed(self.document.end()))
    }

    fn splice_selection(&mut self, selection: Selection, replacement: &[String]) {
        let cursor = self.document.splice(selection, replacement);
        self.render();
        cursor::restore(&mut self.surface, &self.document, cursor);
        self.schedule_commit();
        self.schedule_save();
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.document.set_from_text(&snapshot.text);
        self.render();
        cursor::restore(&mut self.surface, &self.document, snapshot.cursor);
        self.schedule_save();
    }

    fn render(&mut self) {
        let changed = self.classifier.apply(self.document.lines());
        self.surface
            .redraw(self.document.lines(), self.classifier.styles(), &changed);
    }

    fn flush_commit(&mut self) {
        if self.commit_timer.is_armed() {
            self.commit_timer.cancel();
            self.commit();
        }
    }

    fn schedule_commit(&mut self) {
        let tx = self.events_tx.clone();
        self.commit_timer.arm(move |generation| async move {
            let _ = tx.send(SessionEvent::CommitDue(generation));
        });
    }

    fn schedule_save(&mut self) {
        let tx = self.events_tx.clone();
        self.save_timer.arm(move |generation| async move {
            let _ = tx.send(SessionEvent::SaveDue(generation));
        });
    }

    fn next_save_seq(&mut self) -> u64 {
        self.save_seq += 1;
        self.save_seq
    }

    fn start_save(&mut self) {
        let seq = self.next_save_seq();
        if self.document.is_blank() {
            self.publish(seq, None);
            return;
        }

        let text = self.document.text();
        self.in_flight += 1;
        let codec = Arc::clone(&self.codec);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = codec.encode(&text).await;
            let _ = tx.send(SessionEvent::Encoded { seq, result });
        });
    }

    fn finish_save(&mut self, seq: u64, result: Result<String, CodecError>) {
        match result {
            Ok(token) => {
                self.publish(seq, Some(token));
            }
            Err(e) => {
                log::error!("Failed to encode document: {}", e);
                self.status.set_error("Could not update link.");
            }
        }
    }

    fn publish(&mut self, seq: u64, token: Option<String>) -> bool {
        if seq <= self.published_seq {
            log::debug!(
                "Discarding stale save #{} (already published #{})",
                seq,
                self.published_seq
            );
            return false;
        }
        self.published_seq = seq;
        self.location.set_token(token);
        true
    }
}
