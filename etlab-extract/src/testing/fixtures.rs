//! HTML builders for extraction tests.

use crate::document::Document;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A table builder: one header row of `th` cells, then `td` data rows.
#[derive(Debug, Clone, Default)]
pub struct TableFixture {
    /// Header cell labels.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<String>>,
    /// Optional `class` attribute.
    pub class: Option<String>,
}

impl TableFixture {
    /// Creates a table with the given header labels.
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Appends a data row.
    #[must_use]
    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the `class` attribute.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Renders the table markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = match &self.class {
            Some(class) => format!("<table class=\"{}\">", escape(class)),
            None => "<table>".to_string(),
        };
        html.push_str("<tr>");
        for header in &self.headers {
            html.push_str(&format!("<th>{}</th>", escape(header)));
        }
        html.push_str("</tr>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

/// A page builder producing a full HTML document.
#[derive(Debug, Clone, Default)]
pub struct PageFixture {
    /// Page title.
    pub title: Option<String>,
    /// Body fragments, in order.
    pub body: Vec<String>,
}

impl PageFixture {
    /// Creates an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `<title>`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends a heading of the given tag, followed by a table when present.
    #[must_use]
    pub fn with_section(mut self, tag: &str, heading: &str, table: Option<&TableFixture>) -> Self {
        self.body.push(format!("<{tag}>{}</{tag}>", escape(heading)));
        if let Some(table) = table {
            self.body.push(format!("<div class=\"table-responsive\">{}</div>", table.to_html()));
        }
        self
    }

    /// Appends an `h5` heading and its table.
    #[must_use]
    pub fn with_h5(self, heading: &str, table: &TableFixture) -> Self {
        self.with_section("h5", heading, Some(table))
    }

    /// Appends raw markup.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.body.push(html.into());
        self
    }

    /// Renders the page markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        let title = self
            .title
            .as_deref()
            .map(|t| format!("<title>{}</title>", escape(t)))
            .unwrap_or_default();
        format!(
            "<!DOCTYPE html><html><head>{title}</head><body>{}</body></html>",
            self.body.concat()
        )
    }

    /// Parses the rendered page.
    #[must_use]
    pub fn document(&self) -> Document {
        Document::parse(&self.to_html())
    }
}
