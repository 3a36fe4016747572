use sqlx::{
    MySql,
    mysql::MySqlArguments,
    query::{Query, QueryAs, QueryScalar},
};

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
}

/// ===============================
/// SQL fragment + its bindings
/// ===============================
#[derive(Debug, Default, PartialEq)]
pub struct SqlClause {
    pub parts: Vec<String>,
    pub values: Vec<SqlValue>,
}

impl SqlClause {
    pub fn push(&mut self, part: impl Into<String>, value: SqlValue) {
        self.parts.push(part.into());
        self.values.push(value);
    }

    /// `WHERE a = ? AND b = ?`, or nothing
    pub fn where_sql(&self) -> String {
        if self.parts.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.parts.join(" AND "))
        }
    }

    /// `a = ?, b = ?`
    pub fn set_sql(&self) -> String {
        self.parts.join(", ")
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside LIKE.
pub fn like_contains(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// ===============================
/// Bind helpers
/// ===============================
pub fn bind_query<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: &[SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::String(v) => query.bind(v.clone()),
            SqlValue::U64(v) => query.bind(*v),
        };
    }
    query
}

pub fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    values: &[SqlValue],
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::String(v) => query.bind(v.clone()),
            SqlValue::U64(v) => query.bind(*v),
        };
    }
    query
}

pub fn bind_query_scalar<'q, O>(
    mut query: QueryScalar<'q, MySql, O, MySqlArguments>,
    values: &[SqlValue],
) -> QueryScalar<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::String(v) => query.bind(v.clone()),
            SqlValue::U64(v) => query.bind(*v),
        };
    }
    query
}
