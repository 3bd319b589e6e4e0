use super::{Formatter, ToSql};

/// An identifier, quoted and case-folded for the dialect.
pub(crate) struct Ident<S>(pub(crate) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let quoted = f.dialect.quote(self.0.as_ref());
        f.dst.push_str(&quoted);
    }
}
