use clipdeck_common::{HostBridge, PanelAction, Subscription};
use tracing::{debug, trace};

use crate::filter::filter_history;
use crate::viewport::Viewport;

/// Presentation order of the list. Indices stay history indices either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Most recent entry on the first row.
    #[default]
    NewestFirst,
    /// History order, oldest entry on the first row.
    OldestFirst,
}

/// One presented row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// Index into the history.
    pub index: usize,
    pub text: &'a str,
    pub selected: bool,
}

/// Whether the panel consumed an action. A handled key must not fall
/// through to the front end's own default behaviour (scrolling etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Ignored,
}

/// Searchable clipboard history list whose selection mirrors the system
/// clipboard.
///
/// The panel does nothing until [`mount`](Self::mount)ed. While mounted it
/// owns a history subscription; [`unmount`](Self::unmount) drops it and from
/// then on every action is ignored.
pub struct ClipboardPanel<B: HostBridge> {
    bridge: B,
    history: Vec<String>,
    selection: Option<usize>,
    query: String,
    order: Order,
    viewport: Viewport,
    subscription: Option<Subscription>,
}

impl<B: HostBridge> ClipboardPanel<B> {
    pub fn new(bridge: B, order: Order) -> Self {
        ClipboardPanel {
            bridge,
            history: Vec::new(),
            selection: None,
            query: String::new(),
            order,
            viewport: Viewport::default(),
            subscription: None,
        }
    }

    /// Subscribe to history pushes and ask the host for the current
    /// snapshot. Mounting twice keeps the first subscription.
    pub fn mount(&mut self) {
        if self.subscription.is_some() {
            debug!("Panel already mounted");
            return;
        }
        // Subscribe first so the snapshot answering the request is not missed.
        let subscription = self.bridge.subscribe_history_updates();
        debug!("Panel mounted (subscription {})", subscription.id());
        self.subscription = Some(subscription);
        self.bridge.request_history_snapshot();
    }

    /// Release the history subscription and stop reacting to input.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!("Panel unmounted (subscription {})", subscription.id());
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Apply every history snapshot pushed since the last call, oldest
    /// first. Returns true if at least one arrived.
    pub fn pump(&mut self) -> bool {
        let mut updated = false;
        while let Some(history) = self.subscription.as_mut().and_then(Subscription::try_next) {
            self.on_history_update(history);
            updated = true;
        }
        updated
    }

    fn on_history_update(&mut self, history: Vec<String>) {
        trace!("History update: {} entries", history.len());
        self.history = history;

        if self.history.is_empty() {
            self.selection = None;
        } else {
            self.selection = Some(self.history.len() - 1);
            self.write_selection();
        }

        self.reveal_selection();
    }

    /// Run a front-end action against the panel.
    pub fn dispatch(&mut self, action: PanelAction) -> Dispatch {
        if !self.is_mounted() {
            trace!("Ignoring {:?} on unmounted panel", action);
            return Dispatch::Ignored;
        }

        match action {
            PanelAction::MoveUp => self.move_up(),
            PanelAction::MoveDown => self.move_down(),
            PanelAction::PageUp => self.page_up(),
            PanelAction::PageDown => self.page_down(),
            PanelAction::SelectFirst => self.select_first(),
            PanelAction::SelectLast => self.select_last(),
            PanelAction::SelectRow(row) => self.select_row(row),
            PanelAction::SelectIndex(index) => self.select_index(index),
            PanelAction::InsertText(text) => {
                let mut query = self.query.clone();
                query.push_str(&text);
                self.set_query(query);
            }
            PanelAction::DeleteChar => {
                let mut query = self.query.clone();
                if query.pop().is_none() {
                    return Dispatch::Ignored;
                }
                self.set_query(query);
            }
            PanelAction::SetQuery(query) => self.set_query(query),
            PanelAction::ClearQuery => self.set_query(String::new()),
            PanelAction::Confirm | PanelAction::Close => self.close(),
        }

        Dispatch::Handled
    }

    /// Select the entry at history index `index` and mirror it to the
    /// clipboard. Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) {
        if index >= self.history.len() {
            trace!("Selection {} out of range ({})", index, self.history.len());
            return;
        }
        self.selection = Some(index);
        self.write_selection();
    }

    /// Select whatever entry is presented on `row`.
    pub fn select_row(&mut self, row: usize) {
        let rows = self.row_indices();
        if let Some(&index) = rows.get(row) {
            self.select_index(index);
            self.viewport.scroll_into_view(row);
        }
    }

    pub fn move_up(&mut self) {
        self.step(|current, _| current.map_or(0, |pos| pos.saturating_sub(1)));
    }

    pub fn move_down(&mut self) {
        self.step(|current, last| current.map_or(0, |pos| (pos + 1).min(last)));
    }

    pub fn page_up(&mut self) {
        let page = self.page_size();
        self.step(|current, _| current.map_or(0, |pos| pos.saturating_sub(page)));
    }

    pub fn page_down(&mut self) {
        let page = self.page_size();
        self.step(|current, last| current.map_or(0, |pos| (pos + page).min(last)));
    }

    pub fn select_first(&mut self) {
        self.step(|_, _| 0);
    }

    pub fn select_last(&mut self) {
        self.step(|_, last| last);
    }

    /// Move the selection to the presented row chosen by `target`, given the
    /// current row (if the selection is presented at all) and the last row.
    fn step(&mut self, target: impl FnOnce(Option<usize>, usize) -> usize) {
        let rows = self.row_indices();
        if rows.is_empty() {
            return;
        }

        let current = self.selected_position(&rows);
        let next = target(current, rows.len() - 1);
        if current == Some(next) {
            return;
        }

        self.selection = Some(rows[next]);
        self.write_selection();
        self.viewport.scroll_into_view(next);
    }

    fn page_size(&self) -> usize {
        self.viewport.height().max(1)
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.reveal_selection();
    }

    /// Ask the host to close the surface.
    pub fn close(&mut self) {
        debug!("Close requested");
        self.bridge.request_close();
    }

    fn write_selection(&self) {
        let Some(text) = self.selected_text() else {
            return;
        };
        if text.is_empty() {
            trace!("Not writing empty entry to the clipboard");
            return;
        }
        self.bridge.write_active_value(text);
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection
            .and_then(|i| self.history.get(i))
            .map(String::as_str)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Tell the panel how many rows fit on screen.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.set_height(height);
        self.reveal_selection();
    }

    /// Clamp the viewport to the presented rows and bring the selected row,
    /// if presented, on screen.
    fn reveal_selection(&mut self) {
        let rows = self.row_indices();
        self.viewport.clamp(rows.len());
        if let Some(pos) = self.selected_position(&rows) {
            self.viewport.scroll_into_view(pos);
        }
    }

    /// History entries matching the query, in history order.
    pub fn filtered_view(&self) -> Vec<(usize, &str)> {
        filter_history(&self.history, &self.query)
    }

    /// The filtered view in presentation order.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows: Vec<Row<'_>> = self
            .filtered_view()
            .into_iter()
            .map(|(index, text)| Row {
                index,
                text,
                selected: self.selection == Some(index),
            })
            .collect();
        if self.order == Order::NewestFirst {
            rows.reverse();
        }
        rows
    }

    /// Presented row holding the selection, if it passes the filter.
    pub fn selected_row(&self) -> Option<usize> {
        self.selected_position(&self.row_indices())
    }

    fn row_indices(&self) -> Vec<usize> {
        self.rows().into_iter().map(|row| row.index).collect()
    }

    fn selected_position(&self, rows: &[usize]) -> Option<usize> {
        let selection = self.selection?;
        rows.iter().position(|&index| index == selection)
    }
}

impl<B: HostBridge> Drop for ClipboardPanel<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
