//! The table the list view renders: typed columns over JSON rows, with
//! request-driven ordering and linked cells reversed from named routes.

use serde_json::{json, Value};

use cruditor_core::text::capfirst;
use cruditor_http::urls::ReverseUrls;
use cruditor_http::HttpRequest;

/// A single table column.
#[derive(Debug, Clone)]
pub struct Column {
    /// The column identifier.
    pub name: String,
    /// The header text.
    pub header: String,
    /// The row field rendered into the cells.
    pub accessor: String,
    /// When set, cells link to this route, reversed with the row key.
    pub link_urlname: Option<String>,
}

impl Column {
    /// Creates a column whose header is derived from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let header = capfirst(&name.replace('_', " "));
        Self {
            accessor: name.clone(),
            name,
            header,
            link_urlname: None,
        }
    }

    /// Overrides the header text.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Renders the cells from a different row field.
    #[must_use]
    pub fn accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = accessor.into();
        self
    }

    /// Links the cells to the given route name.
    #[must_use]
    pub fn linked(mut self, urlname: impl Into<String>) -> Self {
        self.link_urlname = Some(urlname.into());
        self
    }
}

/// The declarative shape of a table.
#[derive(Debug, Clone, Default)]
pub struct TableSpec {
    /// The columns, in render order.
    pub columns: Vec<Column>,
    /// The row field used as the URL argument for linked cells.
    pub key_accessor: String,
}

impl TableSpec {
    /// Creates a table spec with the given columns and the default `pk` key.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            key_accessor: "pk".to_string(),
        }
    }

    /// Overrides the row field used as the URL argument for linked cells.
    #[must_use]
    pub fn key_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.key_accessor = accessor.into();
        self
    }

    /// The single linked column a collection list falls back to when no
    /// explicit table is configured.
    pub fn single_link_column(
        header: impl Into<String>,
        accessor: impl Into<String>,
        detail_urlname: Option<&str>,
    ) -> Self {
        let mut column = Column::new("item").header(header).accessor(accessor);
        if let Some(urlname) = detail_urlname {
            column = column.linked(urlname);
        }
        Self::new(vec![column])
    }
}

/// A table ready for rendering: a spec plus ordered rows.
#[derive(Debug)]
pub struct Table {
    spec: TableSpec,
    rows: Vec<Value>,
}

impl Table {
    /// Creates a table from a spec and rows.
    pub fn new(spec: TableSpec, rows: Vec<Value>) -> Self {
        Self { spec, rows }
    }

    /// Returns the rows in their current order.
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Applies ordering from the request's `sort` query parameter.
    ///
    /// A leading `-` sorts descending.
    pub fn configure(&mut self, request: &HttpRequest) {
        if let Some(sort) = request.get().get("sort") {
            self.order_by(sort);
        }
    }

    /// Orders the rows by a field name; a leading `-` reverses.
    pub fn order_by(&mut self, sort: &str) {
        let (field, descending) = sort
            .strip_prefix('-')
            .map_or((sort, false), |field| (field, true));

        self.rows.sort_by(|a, b| {
            let left = cell_text(a, field);
            let right = cell_text(b, field);
            match (a.get(field).and_then(Value::as_i64), b.get(field).and_then(Value::as_i64)) {
                (Some(l), Some(r)) => l.cmp(&r),
                _ => left.cmp(&right),
            }
        });
        if descending {
            self.rows.reverse();
        }
    }

    /// Renders the table into a JSON context: headers plus cell rows, with
    /// linked cells reversed through `urls`.
    ///
    /// A link whose route cannot be reversed is omitted, not an error.
    pub fn as_context(&self, urls: Option<&dyn ReverseUrls>) -> Value {
        let headers: Vec<&str> = self
            .spec
            .columns
            .iter()
            .map(|c| c.header.as_str())
            .collect();

        let rows: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<Value> = self
                    .spec
                    .columns
                    .iter()
                    .map(|column| {
                        let text = cell_text(row, &column.accessor);
                        let url = column.link_urlname.as_deref().and_then(|urlname| {
                            let key = cell_text(row, &self.spec.key_accessor);
                            urls.and_then(|u| u.reverse_url(urlname, &[&key]))
                        });
                        json!({"text": text, "url": url})
                    })
                    .collect();
                Value::Array(cells)
            })
            .collect();

        json!({"headers": headers, "rows": rows})
    }
}

fn cell_text(row: &Value, accessor: &str) -> String {
    match row.get(accessor) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
