//! Live document state for the mock driver.

use super::css::{DomView, Selector};
use super::site::{ClickAction, MockElement, MockPage};
use crate::driver::ElementSnapshot;
use crate::locator::BoundingBox;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::time::Instant;

/// Vertical pitch of the fake layout
const ROW_HEIGHT: f64 = 48.0;

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) tag: String,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) text: String,
    pub(crate) value: Option<String>,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) selected: bool,
    pub(crate) focusable: bool,
    image_loaded: bool,
    appear_after: Duration,
    reveal_after: Duration,
    fade_in: Duration,
    widths: Option<(u32, u32)>,
    pub(crate) on_click: Vec<ClickAction>,
    pub(crate) on_submit: Vec<ClickAction>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// A loaded page: nodes in document order plus load time
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub(crate) nodes: Vec<Node>,
    pub(crate) title: String,
    ready_after: Duration,
    loaded_at: Instant,
}

impl Document {
    pub(crate) fn blank() -> Self {
        Self::load(&MockPage::default())
    }

    pub(crate) fn load(page: &MockPage) -> Self {
        let mut nodes = Vec::new();
        for element in &page.body {
            flatten(element, None, &mut nodes);
        }
        Self {
            nodes,
            title: page.title.clone(),
            ready_after: page.ready_after,
            loaded_at: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.loaded_at.elapsed()
    }

    pub(crate) fn ready_state(&self) -> &'static str {
        if self.elapsed() >= self.ready_after {
            "complete"
        } else {
            "interactive"
        }
    }

    /// In the DOM, together with every ancestor
    pub(crate) fn present(&self, n: usize) -> bool {
        let elapsed = self.elapsed();
        self.lineage(n).all(|i| elapsed >= self.nodes[i].appear_after)
    }

    fn own_opacity(&self, n: usize) -> f64 {
        let fade = self.nodes[n].fade_in;
        if fade.is_zero() {
            return 1.0;
        }
        (self.elapsed().as_secs_f64() / fade.as_secs_f64()).min(1.0)
    }

    /// Rendered for a viewport `width` pixels wide
    pub(crate) fn visible(&self, n: usize, width: u32) -> bool {
        let elapsed = self.elapsed();
        self.present(n)
            && self.own_opacity(n) > 0.0
            && self.lineage(n).all(|i| {
                let node = &self.nodes[i];
                node.visible
                    && elapsed >= node.reveal_after
                    && node
                        .widths
                        .map_or(true, |(min, max)| (min..=max).contains(&width))
            })
    }

    fn lineage(&self, n: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(n), move |&i| self.nodes[i].parent)
    }

    /// Present nodes matching `selector`, in document order
    pub(crate) fn query(&self, selector: &Selector) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&n| self.present(n) && selector.matches(self, n))
            .collect()
    }

    /// Nearest enclosing `<form>`, the node itself included
    pub(crate) fn form_of(&self, n: usize) -> Option<usize> {
        self.lineage(n).find(|&i| self.nodes[i].tag == "form")
    }

    /// Rendered text: own text followed by visible descendants'
    pub(crate) fn text(&self, n: usize, width: u32) -> String {
        let mut parts = Vec::new();
        self.collect_text(n, width, &mut parts);
        parts.join(" ")
    }

    fn collect_text(&self, n: usize, width: u32, parts: &mut Vec<String>) {
        let node = &self.nodes[n];
        let own = node.text.trim();
        if !own.is_empty() {
            parts.push(own.to_string());
        }
        for &child in &node.children {
            if self.visible(child, width) {
                self.collect_text(child, width, parts);
            }
        }
    }

    pub(crate) fn snapshot(&self, n: usize, width: u32) -> ElementSnapshot {
        let node = &self.nodes[n];
        let visible = self.visible(n, width);
        let rect = if visible {
            #[allow(clippy::cast_precision_loss)]
            BoundingBox::new(0.0, n as f64 * ROW_HEIGHT, f64::from(width), ROW_HEIGHT - 8.0)
        } else {
            BoundingBox::default()
        };
        ElementSnapshot {
            tag: node.tag.clone(),
            text: if visible {
                self.text(n, width)
            } else {
                String::new()
            },
            value: node.value.clone(),
            visible,
            enabled: node.enabled,
            selected: node.selected,
            opacity: self.own_opacity(n),
            image_loaded: node.tag != "img" || node.image_loaded,
            attributes: node.attributes.clone(),
            rect: Some(rect),
        }
    }

    /// Serialized markup of node `n`
    pub(crate) fn outer_html(&self, n: usize) -> String {
        let mut out = String::new();
        self.write_html(n, &mut out);
        out
    }

    fn write_html(&self, n: usize, out: &mut String) {
        let node = &self.nodes[n];
        let _ = write!(out, "<{}", node.tag);
        for (name, value) in &node.attributes {
            let _ = write!(out, " {name}=\"{}\"", value.replace('"', "&quot;"));
        }
        out.push('>');
        out.push_str(&node.text);
        for &child in &node.children {
            if self.present(child) {
                self.write_html(child, out);
            }
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    /// Apply a visibility action to every present match
    pub(crate) fn set_visibility(&mut self, selector: &Selector, change: Visibility) {
        for n in self.query(selector) {
            let node = &mut self.nodes[n];
            node.visible = match change {
                Visibility::Show => true,
                Visibility::Hide => false,
                Visibility::Toggle => !node.visible,
            };
            node.reveal_after = Duration::ZERO;
        }
    }

    /// Height of the rendered document
    pub(crate) fn scroll_height(&self, width: u32) -> u64 {
        let rows = (0..self.nodes.len())
            .filter(|&n| self.visible(n, width))
            .count();
        rows as u64 * ROW_HEIGHT as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visibility {
    Show,
    Hide,
    Toggle,
}

impl DomView for Document {
    fn tag(&self, n: usize) -> &str {
        &self.nodes[n].tag
    }

    fn attr(&self, n: usize, name: &str) -> Option<&str> {
        self.nodes[n].attributes.get(name).map(String::as_str)
    }

    fn parent(&self, n: usize) -> Option<usize> {
        self.nodes[n].parent
    }
}

fn flatten(element: &MockElement, parent: Option<usize>, nodes: &mut Vec<Node>) -> usize {
    let index = nodes.len();
    nodes.push(Node {
        tag: element.tag.clone(),
        attributes: element.attributes.clone(),
        text: element.text.clone(),
        value: element.value.clone(),
        visible: element.visible,
        enabled: element.enabled,
        selected: element.selected,
        focusable: element.focusable,
        image_loaded: element.image_loaded,
        appear_after: element.appear_after,
        reveal_after: element.reveal_after,
        fade_in: element.fade_in,
        widths: element.widths,
        on_click: element.on_click.clone(),
        on_submit: element.on_submit.clone(),
        parent,
        children: Vec::new(),
    });
    for child in &element.children {
        let child_index = flatten(child, Some(index), nodes);
        nodes[index].children.push(child_index);
    }
    index
}
