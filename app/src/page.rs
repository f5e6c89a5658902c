//! Documents, and the frame every page is rendered inside.
//!
//! A [`Document`] is a title plus a tree of [`Node`]s. It renders to HTML
//! through `Display`, escaping text and attribute values.

use crate::route::Route;
use crate::viewer::{Username, Viewer};
use std::fmt;

/// A rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Window title
    pub title: String,
    /// Page content
    pub body: Vec<Node>,
}

impl Document {
    /// Create a document
    #[must_use]
    pub fn new(title: impl Into<String>, body: Vec<Node>) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }

    /// All text in the body, concatenated
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.body {
            node.collect_text(&mut text);
        }
        text
    }

    /// Every link target in the body, in document order
    #[must_use]
    pub fn links(&self) -> Vec<&str> {
        let mut links = Vec::new();
        for node in &self.body {
            node.collect_links(&mut links);
        }
        links
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<title>")?;
        escape(f, &self.title)?;
        writeln!(f, "</title>")?;
        for node in &self.body {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// A piece of markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Plain text
    Text(String),
    /// An element with attributes and children
    Element {
        /// Tag name
        tag: &'static str,
        /// Attribute name/value pairs
        attrs: Vec<(&'static str, String)>,
        /// Child nodes
        children: Vec<Node>,
    },
}

impl Node {
    /// A text node
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// An empty element
    #[must_use]
    pub const fn element(tag: &'static str) -> Self {
        Self::Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A link
    #[must_use]
    pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self::element("a").attr("href", href).child(Self::text(label))
    }

    /// Add an attribute (ignored on text nodes)
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((name, value.into()));
        }
        self
    }

    /// Set the `class` attribute
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Append a child (ignored on text nodes)
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Append children (ignored on text nodes)
    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = Self>) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            },
        }
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Self::Element {
            tag,
            attrs,
            children,
        } = self
        {
            if *tag == "a" {
                out.extend(
                    attrs
                        .iter()
                        .filter(|(name, _)| *name == "href")
                        .map(|(_, value)| value.as_str()),
                );
            }
            for child in children {
                child.collect_links(out);
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => escape(f, text),
            Self::Element {
                tag,
                attrs,
                children,
            } => {
                write!(f, "<{tag}")?;
                for (name, value) in attrs {
                    write!(f, " {name}=\"")?;
                    escape(f, value)?;
                    write!(f, "\"")?;
                }
                write!(f, ">")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            },
        }
    }
}

fn escape(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&#39;")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

/// Which header link to highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivePage {
    /// No header link
    Other,
    /// Home
    Home,
    /// Sign in
    Login,
    /// Sign up
    Register,
    /// Settings
    Settings,
    /// A profile; only the viewer's own profile link is highlighted
    Profile(Username),
    /// New Post
    NewArticle,
}

impl ActivePage {
    fn matches(&self, route: &Route) -> bool {
        match (self, route) {
            (Self::Home, Route::Home)
            | (Self::Login, Route::Login)
            | (Self::Register, Route::Register)
            | (Self::Settings, Route::Settings)
            | (Self::NewArticle, Route::NewArticle) => true,
            (Self::Profile(page), Route::Profile(link)) => page == link,
            _ => false,
        }
    }
}

fn nav_link(active: &ActivePage, route: &Route, label: &str) -> Node {
    let class = if active.matches(route) {
        "nav-link active"
    } else {
        "nav-link"
    };
    Node::element("li")
        .class("nav-item")
        .child(Node::link(route.href(), label).class(class))
}

fn header(viewer: Option<&Viewer>, active: &ActivePage) -> Node {
    let mut links = vec![nav_link(active, &Route::Home, "Home")];
    match viewer {
        Some(viewer) => {
            let username = viewer.username();
            links.push(nav_link(active, &Route::NewArticle, "New Post"));
            links.push(nav_link(active, &Route::Settings, "Settings"));
            links.push(nav_link(
                active,
                &Route::Profile(username.clone()),
                username.as_str(),
            ));
            links.push(nav_link(active, &Route::Logout, "Sign out"));
        },
        None => {
            links.push(nav_link(active, &Route::Login, "Sign in"));
            links.push(nav_link(active, &Route::Register, "Sign up"));
        },
    }

    Node::element("nav").class("navbar navbar-light").child(
        Node::element("div")
            .class("container")
            .child(Node::link(Route::Home.href(), "conduit").class("navbar-brand"))
            .child(Node::element("ul").class("nav navbar-nav pull-xs-right").children(links)),
    )
}

fn footer() -> Node {
    Node::element("footer").child(
        Node::element("div")
            .class("container")
            .child(Node::link(Route::Home.href(), "conduit").class("logo-font"))
            .child(
                Node::element("span")
                    .class("attribution")
                    .child(Node::text("An interactive learning project from "))
                    .child(Node::link("https://thinkster.io", "Thinkster"))
                    .child(Node::text(". Code & design licensed under MIT.")),
            ),
    )
}

/// Render `content` inside the Conduit frame
///
/// The title becomes `"{title} - Conduit"`, the header reflects who is
/// signed in and highlights `active`.
#[must_use]
pub fn frame(viewer: Option<&Viewer>, active: &ActivePage, content: Document) -> Document {
    let mut body = Vec::with_capacity(content.body.len() + 2);
    body.push(header(viewer, active));
    body.extend(content.body);
    body.push(footer());

    Document {
        title: format!("{} - Conduit", content.title),
        body,
    }
}

/// Shown while a redirect is resolved
#[must_use]
pub fn blank() -> Document {
    Document::new("", Vec::new())
}

/// Shown for URLs that name no route
#[must_use]
pub fn not_found() -> Document {
    Document::new(
        "Page Not Found",
        vec![
            Node::element("main")
                .attr("id", "content")
                .class("container")
                .child(Node::element("h1").child(Node::text("Not Found"))),
        ],
    )
}
