//! Virtualized infinite list
//!
//! Backs the year picker. Only the window `[from, to]` is materialized;
//! approaching either edge (by scrolling or keyboard) grows the window by
//! `window` more items in that direction. Growth only prepends or appends,
//! existing items are never rebuilt, and prepending shifts `scroll_top` by
//! the added height so the visible item does not jump.

use chrono::Datelike;
use std::collections::VecDeque;
use tracing::trace;

use crate::config::PickerConfig;

/// External field the list writes its selection into
pub trait BoundField {
    fn bind(&mut self, value: i64);
}

impl BoundField for String {
    fn bind(&mut self, value: i64) {
        *self = value.to_string();
    }
}

impl BoundField for Option<i64> {
    fn bind(&mut self, value: i64) {
        *self = Some(value);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionListConfig {
    /// Items added on each side at build time and per growth step
    pub window: i64,
    pub item_height: f64,
    /// Distance from an edge (px) that triggers growth while scrolling
    pub threshold: f64,
    pub viewport_height: f64,
    /// Distance from an edge (items) that triggers growth on keyboard moves
    pub edge_margin: i64,
    pub page_step: i64,
    /// Home target
    pub ceiling: i64,
    /// End target
    pub floor: i64,
}

impl Default for SelectionListConfig {
    fn default() -> Self {
        Self {
            window: 80,
            item_height: 20.0,
            threshold: 40.0,
            viewport_height: 200.0,
            edge_margin: 5,
            page_step: 10,
            ceiling: 9999,
            floor: 1,
        }
    }
}

impl From<&PickerConfig> for SelectionListConfig {
    fn from(picker: &PickerConfig) -> Self {
        Self {
            window: picker.window,
            item_height: picker.item_height,
            threshold: picker.item_height * 2.0,
            viewport_height: picker.viewport_height,
            ..Self::default()
        }
    }
}

/// Materialized range of the sequence. `from <= selected <= to` after every
/// mutation and `to - from` never shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub anchor: i64,
    pub from: i64,
    pub to: i64,
    pub selected: i64,
}

impl YearWindow {
    fn around(anchor: i64, half: i64) -> Self {
        Self {
            anchor,
            from: anchor - half,
            to: anchor + half,
            selected: anchor,
        }
    }

    pub fn len(&self) -> usize {
        (self.to - self.from + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.from..=self.to).contains(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub value: i64,
    pub selected: bool,
}

impl ListItem {
    pub fn label(&self) -> String {
        self.value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Escape,
}

/// Result of a keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Moved(i64),
    Closed,
    Ignored,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Growth {
    pub prepended: usize,
    pub appended: usize,
}

impl Growth {
    pub fn is_none(&self) -> bool {
        self.prepended == 0 && self.appended == 0
    }

    fn merge(&mut self, other: Growth) {
        self.prepended += other.prepended;
        self.appended += other.appended;
    }
}

pub struct SelectionList<F: BoundField> {
    config: SelectionListConfig,
    field: F,
    selected: i64,
    window: Option<YearWindow>,
    items: VecDeque<ListItem>,
    scroll_top: f64,
    open: bool,
    items_created: u64,
}

impl<F: BoundField> SelectionList<F> {
    pub fn new(start: i64, config: SelectionListConfig, field: F) -> Self {
        Self {
            config,
            field,
            selected: start,
            window: None,
            items: VecDeque::new(),
            scroll_top: 0.0,
            open: false,
            items_created: 0,
        }
    }

    /// Year picker anchored at the current calendar year
    pub fn year_picker(config: SelectionListConfig, field: F) -> Self {
        let year = i64::from(chrono::Local::now().year());
        Self::new(year, config, field)
    }

    pub fn config(&self) -> &SelectionListConfig {
        &self.config
    }

    pub fn selected(&self) -> i64 {
        self.selected
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    pub fn window(&self) -> Option<&YearWindow> {
        self.window.as_ref()
    }

    pub fn items(&self) -> &VecDeque<ListItem> {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_built(&self) -> bool {
        self.window.is_some()
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Items ever materialized; equals `items().len()` because growth never
    /// rebuilds existing items.
    pub fn items_created(&self) -> u64 {
        self.items_created
    }

    pub fn content_height(&self) -> f64 {
        self.items.len() as f64 * self.config.item_height
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.config.viewport_height).max(0.0)
    }

    /// Index of the first item intersecting the viewport
    pub fn first_visible(&self) -> usize {
        (self.scroll_top / self.config.item_height).floor() as usize
    }

    /// Number of items that fit in the viewport
    pub fn visible_count(&self) -> usize {
        (self.config.viewport_height / self.config.item_height).ceil() as usize
    }

    /// Builds the item list on first open only; later opens reuse it.
    pub fn open(&mut self) {
        if self.window.is_none() {
            self.build();
        }
        self.open = true;
        self.center_selected();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// A click anywhere on the page; clicks outside the control close it
    pub fn click(&mut self, inside_root: bool) {
        if !inside_root && self.open {
            self.close();
        }
    }

    /// Mouse wheel over the closed control nudges the selection by one.
    /// Returns false when the list is open (the wheel scrolls instead).
    pub fn wheel(&mut self, delta: f64) -> bool {
        if self.open || delta == 0.0 {
            return false;
        }
        let step = if delta > 0.0 { 1 } else { -1 };
        self.move_to(self.selected + step);
        true
    }

    /// Scroll handler. Near the top the window grows upward and the offset is
    /// compensated; near the bottom it grows downward.
    pub fn scroll_to(&mut self, scroll_top: f64) -> Growth {
        let mut growth = Growth::default();
        if self.window.is_none() {
            return growth;
        }
        self.scroll_top = scroll_top.clamp(0.0, self.max_scroll());

        if self.scroll_top <= self.config.threshold {
            growth.merge(self.prepend(self.config.window));
        }
        let bottom = self.scroll_top + self.config.viewport_height;
        if bottom >= self.content_height() - self.config.threshold {
            growth.merge(self.append(self.config.window));
        }
        growth
    }

    pub fn scroll_by(&mut self, delta: f64) -> Growth {
        self.scroll_to(self.scroll_top + delta)
    }

    pub fn handle_key(&mut self, key: ListKey) -> ListOutcome {
        let target = match key {
            ListKey::Up => self.selected - 1,
            ListKey::Down => self.selected + 1,
            ListKey::PageUp => self.selected - self.config.page_step,
            ListKey::PageDown => self.selected + self.config.page_step,
            ListKey::Home => self.config.ceiling,
            ListKey::End => self.config.floor,
            ListKey::Enter | ListKey::Escape => {
                if self.open {
                    self.close();
                    return ListOutcome::Closed;
                }
                return ListOutcome::Ignored;
            }
        };
        self.move_to(target);
        if self.open {
            self.scroll_selected_into_view();
        }
        ListOutcome::Moved(self.selected)
    }

    /// Click on an item (or any programmatic selection)
    pub fn select(&mut self, value: i64) {
        self.move_to(value);
    }

    fn move_to(&mut self, value: i64) {
        let previous = self.selected;
        self.selected = value;
        if self.window.is_some() {
            self.ensure_margin(value);
            if let Some(window) = self.window.as_mut() {
                window.selected = value;
            }
            self.rehighlight(previous, value);
        }
        self.field.bind(value);
        trace!(value, "selection moved");
    }

    fn build(&mut self) {
        let window = YearWindow::around(self.selected, self.config.window);
        self.items = (window.from..=window.to)
            .map(|value| ListItem {
                value,
                selected: value == self.selected,
            })
            .collect();
        self.items_created = self.items.len() as u64;
        self.window = Some(window);
    }

    /// Grow until `value` is more than `edge_margin` items from both edges
    fn ensure_margin(&mut self, value: i64) {
        let margin = self.config.edge_margin;
        while let Some(window) = self.window
            && value - window.from <= margin
        {
            self.prepend(self.config.window);
        }
        while let Some(window) = self.window
            && window.to - value <= margin
        {
            self.append(self.config.window);
        }
    }

    fn prepend(&mut self, count: i64) -> Growth {
        let Some(window) = self.window.as_mut() else {
            return Growth::default();
        };
        let from = window.from;
        for value in (from - count..from).rev() {
            self.items.push_front(ListItem {
                value,
                selected: false,
            });
        }
        window.from -= count;
        self.items_created += count as u64;
        self.scroll_top += count as f64 * self.config.item_height;
        Growth {
            prepended: count as usize,
            appended: 0,
        }
    }

    fn append(&mut self, count: i64) -> Growth {
        let Some(window) = self.window.as_mut() else {
            return Growth::default();
        };
        let to = window.to;
        for value in to + 1..=to + count {
            self.items.push_back(ListItem {
                value,
                selected: false,
            });
        }
        window.to += count;
        self.items_created += count as u64;
        Growth {
            prepended: 0,
            appended: count as usize,
        }
    }

    /// Clear the marker on the old item, then set it on the new one
    fn rehighlight(&mut self, previous: i64, current: i64) {
        let Some(window) = self.window else {
            return;
        };
        if let Some(item) = self.items.get_mut((previous - window.from) as usize)
            && window.contains(previous)
        {
            item.selected = false;
        }
        if let Some(item) = self.items.get_mut((current - window.from) as usize) {
            item.selected = true;
        }
    }

    fn item_top(&self, value: i64) -> f64 {
        let from = self.window.map(|w| w.from).unwrap_or(value);
        (value - from) as f64 * self.config.item_height
    }

    fn center_selected(&mut self) {
        let top = self.item_top(self.selected);
        let centered = top - self.config.viewport_height / 2.0 + self.config.item_height / 2.0;
        self.scroll_top = centered.clamp(0.0, self.max_scroll());
    }

    fn scroll_selected_into_view(&mut self) {
        let top = self.item_top(self.selected);
        let bottom = top + self.config.item_height;
        if top < self.scroll_top {
            self.scroll_top = top;
        } else if bottom > self.scroll_top + self.config.viewport_height {
            self.scroll_top = bottom - self.config.viewport_height;
        }
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn picker(start: i64) -> SelectionList<String> {
        SelectionList::new(start, SelectionListConfig::default(), String::new())
    }

    fn assert_consistent(list: &SelectionList<String>) {
        let Some(window) = list.window() else {
            return;
        };
        assert!(window.from <= window.selected && window.selected <= window.to);
        assert_eq!(window.selected, list.selected());
        assert_eq!(list.items().len(), window.len());
        assert_eq!(list.items_created(), list.items().len() as u64);
        assert_eq!(list.items().front().map(|i| i.value), Some(window.from));
        assert_eq!(list.items().back().map(|i| i.value), Some(window.to));
        let highlighted: Vec<i64> = list
            .items()
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.value)
            .collect();
        assert_eq!(highlighted, vec![list.selected()]);
    }

    #[test]
    fn test_builds_lazily_on_first_open() {
        let mut list = picker(2025);
        assert!(!list.is_built());
        assert!(list.items().is_empty());

        list.open();
        assert!(list.is_built());
        let window = *list.window().unwrap();
        assert_eq!((window.from, window.to), (1945, 2105));
        assert_eq!(list.items().len(), 161);

        list.close();
        list.open();
        assert_eq!(list.items_created(), 161);
        assert_consistent(&list);
    }

    #[test]
    fn test_scroll_near_top_prepends_and_compensates() {
        let mut list = picker(2025);
        list.open();
        assert!(list.scroll_top() > 40.0);
        let from_before = list.window().unwrap().from;

        let growth = list.scroll_to(30.0);

        assert_eq!(growth.prepended, 80);
        assert_eq!(list.window().unwrap().from, from_before - 80);
        // the item that sat at 30px now sits 80 items further down
        assert_eq!(list.scroll_top(), 30.0 + 80.0 * 20.0);
        assert_eq!(list.first_visible(), 81);
        assert_eq!(list.items()[list.first_visible()].value, from_before + 1);
        assert_consistent(&list);
    }

    #[test]
    fn test_scroll_near_bottom_appends_without_offset_change() {
        let mut list = picker(2025);
        list.open();
        let to_before = list.window().unwrap().to;
        let bottom = list.content_height() - 200.0;

        let growth = list.scroll_to(bottom);

        assert_eq!(growth.appended, 80);
        assert_eq!(list.window().unwrap().to, to_before + 80);
        assert_eq!(list.scroll_top(), bottom);
        assert_consistent(&list);
    }

    #[test]
    fn test_keyboard_steps() {
        let mut list = picker(2025);
        list.open();

        assert_eq!(list.handle_key(ListKey::Down), ListOutcome::Moved(2026));
        assert_eq!(list.handle_key(ListKey::PageUp), ListOutcome::Moved(2016));
        assert_eq!(list.handle_key(ListKey::Up), ListOutcome::Moved(2015));
        assert_eq!(list.handle_key(ListKey::PageDown), ListOutcome::Moved(2025));
        assert_eq!(list.field(), "2025");
        assert_consistent(&list);
    }

    #[test]
    fn test_keyboard_near_edge_grows_window() {
        let mut list = picker(2025);
        list.open();
        // 1945 + 5 = 1950 is the last value that is still outside the margin
        list.select(1951);
        assert_eq!(list.window().unwrap().from, 1945);

        list.handle_key(ListKey::Up);
        assert_eq!(list.selected(), 1950);
        assert_eq!(list.window().unwrap().from, 1865);
        assert_consistent(&list);
    }

    #[test]
    fn test_home_and_end_jump_to_constants() {
        let mut list = picker(2025);
        list.open();

        list.handle_key(ListKey::Home);
        assert_eq!(list.selected(), 9999);
        assert!(list.window().unwrap().to - 9999 > 5);
        assert_consistent(&list);

        list.handle_key(ListKey::End);
        assert_eq!(list.selected(), 1);
        assert!(1 - list.window().unwrap().from > 5);
        assert_eq!(list.field(), "1");
        assert_consistent(&list);
    }

    #[test]
    fn test_enter_and_escape_close_without_moving() {
        let mut list = picker(2025);
        list.open();
        list.handle_key(ListKey::Down);

        assert_eq!(list.handle_key(ListKey::Enter), ListOutcome::Closed);
        assert!(!list.is_open());
        assert_eq!(list.selected(), 2026);

        assert_eq!(list.handle_key(ListKey::Escape), ListOutcome::Ignored);
        list.open();
        assert_eq!(list.handle_key(ListKey::Escape), ListOutcome::Closed);
        assert_eq!(list.selected(), 2026);
    }

    #[test]
    fn test_wheel_while_closed_nudges() {
        let mut list = picker(2025);
        assert!(list.wheel(1.0));
        assert!(list.wheel(1.0));
        assert!(list.wheel(-3.0));
        assert_eq!(list.selected(), 2026);
        assert_eq!(list.field(), "2026");
        assert!(!list.is_open());

        list.open();
        assert!(!list.wheel(1.0));
        assert_eq!(list.selected(), 2026);
    }

    #[test]
    fn test_click_outside_closes() {
        let mut list = picker(2025);
        list.open();
        list.click(true);
        assert!(list.is_open());
        list.click(false);
        assert!(!list.is_open());
    }

    #[test]
    fn test_select_rehighlights_single_item() {
        let mut list = picker(2025);
        list.open();
        list.select(2000);
        list.select(2010);
        assert_consistent(&list);
        assert_eq!(list.field(), "2010");
    }

    #[test]
    fn test_option_field_binding() {
        let mut list = SelectionList::new(1999, SelectionListConfig::default(), None::<i64>);
        list.select(2001);
        assert_eq!(*list.field(), Some(2001));
    }

    #[derive(Debug, Clone)]
    enum Event {
        Open,
        Close,
        Key(ListKey),
        Scroll(f64),
        Wheel(f64),
        Select(i64),
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            Just(Event::Open),
            Just(Event::Close),
            prop_oneof![
                Just(ListKey::Up),
                Just(ListKey::Down),
                Just(ListKey::PageUp),
                Just(ListKey::PageDown),
                Just(ListKey::Enter),
                Just(ListKey::Escape),
            ]
            .prop_map(Event::Key),
            (0.0f64..5000.0).prop_map(Event::Scroll),
            (-3.0f64..3.0).prop_map(Event::Wheel),
            (1800i64..2200).prop_map(Event::Select),
        ]
    }

    proptest! {
        #[test]
        fn prop_window_invariants_hold(events in proptest::collection::vec(event(), 1..60)) {
            let mut list = picker(2025);
            list.open();
            for event in events {
                let before = list.window().map(|w| w.to - w.from);
                match event {
                    Event::Open => list.open(),
                    Event::Close => list.close(),
                    Event::Key(key) => { list.handle_key(key); }
                    Event::Scroll(top) => { list.scroll_to(top); }
                    Event::Wheel(delta) => { list.wheel(delta); }
                    Event::Select(value) => list.select(value),
                }
                let window = *list.window().unwrap();
                prop_assert!(window.from <= window.selected && window.selected <= window.to);
                prop_assert_eq!(list.items().len() as i64, window.to - window.from + 1);
                prop_assert!(Some(window.to - window.from) >= before);
                prop_assert_eq!(list.items_created(), list.items().len() as u64);
            }
        }
    }
}
