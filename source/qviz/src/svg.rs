// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A minimal SVG element tree and the drawing primitives used to build it.
//!
//! Elements are addressed by paths of element-child indices from the root,
//! ignoring text nodes.


use std::fmt::{self, Display, Write};

const DEFAULT_FONT_SIZE: f64 = 14.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    /// Advance width of a text element, as measured when it was built.
    text_width: Option<f64>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Display) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends `class` to the class list.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    /// Records the advance width of a text element, which bounds it horizontally.
    #[must_use]
    pub fn measured(mut self, width: f64) -> Self {
        self.text_width = Some(width);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses a numeric attribute.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attribute(name)?.trim().parse().ok()
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Display) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attribute("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute("class", classes);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let classes = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("class", classes);
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// Concatenated text of this element and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => text.push_str(t),
                Node::Element(e) => text.push_str(&e.text_content()),
            }
        }
        text
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Node::Text(text.to_string())];
    }

    #[must_use]
    pub fn at(&self, path: &[usize]) -> Option<&Element> {
        path.iter()
            .try_fold(self, |element, &i| element.elements().nth(i))
    }

    pub fn at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        path.iter()
            .try_fold(self, |element, &i| element.elements_mut().nth(i))
    }

    /// Paths of this element and its descendants, depth first, relative to `self`.
    #[must_use]
    pub fn paths(&self) -> Vec<Vec<usize>> {
        let mut paths = vec![Vec::new()];
        for (i, child) in self.elements().enumerate() {
            paths.extend(child.paths().into_iter().map(|mut path| {
                path.insert(0, i);
                path
            }));
        }
        paths
    }

    /// Bounding box in the coordinate space of the parent element. Elements
    /// without a known geometry, and groups without any geometric descendant,
    /// have none.
    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        match self.tag.as_str() {
            "rect" => Some(BBox {
                x: self.number("x")?,
                y: self.number("y")?,
                width: self.number("width")?,
                height: self.number("height")?,
            }),
            "circle" => {
                let r = self.number("r")?;
                Some(BBox {
                    x: self.number("cx")? - r,
                    y: self.number("cy")? - r,
                    width: 2.0 * r,
                    height: 2.0 * r,
                })
            }
            "line" => {
                let (x1, y1) = (self.number("x1")?, self.number("y1")?);
                let (x2, y2) = (self.number("x2")?, self.number("y2")?);
                Some(BBox {
                    x: x1.min(x2),
                    y: y1.min(y2),
                    width: (x2 - x1).abs(),
                    height: (y2 - y1).abs(),
                })
            }
            "text" => {
                let font_size = self.number("font-size").unwrap_or(DEFAULT_FONT_SIZE);
                let width = self.text_width?;
                Some(BBox {
                    x: self.number("x")? - width / 2.0,
                    y: self.number("y")? - font_size / 2.0,
                    width,
                    height: font_size,
                })
            }
            "g" | "svg" => {
                let (dx, dy) = self.translation();
                self.elements()
                    .filter_map(Element::bbox)
                    .reduce(BBox::union)
                    .map(|b| BBox {
                        x: b.x + dx,
                        y: b.y + dy,
                        ..b
                    })
            }
            _ => None,
        }
    }

    /// Offset introduced by a `translate(dx, dy)` transform.
    #[must_use]
    pub fn translation(&self) -> (f64, f64) {
        let Some(args) = self
            .attribute("transform")
            .and_then(|t| t.trim().strip_prefix("translate("))
            .and_then(|t| t.strip_suffix(')'))
        else {
            return (0.0, 0.0);
        };
        let mut values = args
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap_or(0.0));
        let dx = values.next().unwrap_or(0.0);
        let dy = values.next().unwrap_or(0.0);
        (dx, dy)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{}\"", escape(value))?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_char('>')?;
        for child in &self.children {
            match child {
                Node::Element(e) => write!(f, "{e}")?,
                Node::Text(t) => f.write_str(&escape(t))?,
            }
        }
        write!(f, "</{}>", self.tag)
    }
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn union(self, other: BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = self.bottom().max(other.bottom());
        BBox {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

#[must_use]
pub fn group(children: impl IntoIterator<Item = Element>) -> Element {
    Element::new("g").children(children)
}

#[must_use]
pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
    Element::new("line")
        .attr("x1", x1)
        .attr("x2", x2)
        .attr("y1", y1)
        .attr("y2", y2)
}

#[must_use]
pub fn dashed_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
    line(x1, y1, x2, y2).class("qviz-dashed")
}

/// Centered text label.
#[must_use]
pub fn text(content: &str, x: f64, y: f64, font_size: f64) -> Element {
    Element::new("text")
        .attr("font-size", font_size)
        .attr("x", x)
        .attr("y", y)
        .text(content)
}

#[must_use]
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Element {
    Element::new("rect")
        .attr("x", x)
        .attr("y", y)
        .attr("width", width)
        .attr("height", height)
}

/// Dashed outline used around groups.
#[must_use]
pub fn dashed_box(x: f64, y: f64, width: f64, height: f64) -> Element {
    rect(x, y, width, height).class("qviz-dashed")
}

#[must_use]
pub fn circle(cx: f64, cy: f64, r: f64) -> Element {
    Element::new("circle")
        .attr("cx", cx)
        .attr("cy", cy)
        .attr("r", r)
}

/// Upper half of an ellipse with radii `rx`, `ry`, whose bounding box starts at (`x`, `y`).
#[must_use]
pub fn arc(x: f64, y: f64, rx: f64, ry: f64) -> Element {
    let d = format!(
        "M {} {} A {rx} {ry} 0 0 0 {x} {}",
        x + 2.0 * rx,
        y + ry,
        y + ry
    );
    Element::new("path").attr("d", d)
}

#[must_use]
pub fn control_dot(x: f64, y: f64, r: f64) -> Element {
    circle(x, y, r).class("control-dot")
}
