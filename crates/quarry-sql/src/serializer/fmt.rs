use super::Formatter;

/// Writes each fragment in turn, e.g. `fmt!(f, "DROP TABLE ", Ident(name))`.
macro_rules! fmt {
    ($f:expr, $( $fragments:expr ),* $(,)?) => {{
        $(
            $crate::serializer::ToSql::to_sql($fragments, $f);
        )*
    }};
}

pub(crate) trait ToSql {
    fn to_sql(self, f: &mut Formatter<'_>);
}

impl ToSql for &str {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(self);
    }
}

impl ToSql for &String {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(self);
    }
}

impl ToSql for String {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self);
    }
}

impl ToSql for i64 {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.to_string());
    }
}

impl<T: ToSql> ToSql for Option<T> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(fragment) = self {
            fragment.to_sql(f);
        }
    }
}
