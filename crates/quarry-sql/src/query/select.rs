use super::{CompiledQuery, QueryCompiler, Source};
use crate::{Bindings, FilterCompiler, Scope, Statement};

use quarry_core::{
    stmt::{AggFunc, Query, QueryCall},
    Result,
};

impl QueryCompiler<'_> {
    /// `SELECT [projection] FROM t [joins] [WHERE] [GROUP BY] [ORDER BY] [page]`
    pub fn compile(&self, query: &Query) -> Result<CompiledQuery> {
        self.validate(query)?;

        let dialect = self.dialect;
        let source = self.source(query)?;
        let scope = &source.scope;
        let entity = source.entity.clone();
        let mut bindings = Bindings::new();

        let mut columns = vec![];
        let mut relations = vec![];
        let mut hidden = vec![];
        let mut labels = vec![];

        match &query.projection {
            None if !query.group_by.is_empty() => {
                for field in &query.group_by {
                    let label = scope.resolve(field)?.field.name.clone();
                    columns.push(self.labeled(scope.column(dialect, field)?, &label));
                    labels.push(label);
                }
            }
            None => {
                for field in entity.columns() {
                    let column = scope.column(dialect, &field.name)?;
                    columns.push(if query.joins.is_empty() {
                        column
                    } else {
                        self.labeled(column, &field.name)
                    });
                    labels.push(field.name.clone());
                }
                relations.extend(entity.relations().map(|(field, _)| field.name.clone()));
            }
            Some(projection) => {
                for (label, call) in projection.iter() {
                    if let QueryCall::Field(name) = call {
                        if let Some(field) = entity.get_field(name).filter(|f| f.is_relation()) {
                            relations.push(field.name.clone());
                            continue;
                        }
                    }

                    let sql = self.render_call(scope, call, &mut bindings)?;
                    columns.push(self.labeled(sql, label));
                    labels.push(label.clone());
                }
            }
        }

        if !query.nested_query_enabled {
            relations.clear();
        }

        // Relations resolve through their local field, which must be read
        // even when it was not projected
        for name in &relations {
            let Some(relation) = entity.get_field(name).and_then(|f| f.as_relation()) else {
                continue;
            };
            let local = scope.resolve(&relation.local_field)?.field.name.clone();
            if labels.iter().any(|label| label.eq_ignore_ascii_case(&local)) {
                continue;
            }
            columns.push(self.labeled(scope.column(dialect, &local)?, &local));
            labels.push(local.clone());
            hidden.push(local);
        }

        let mut sql = format!("SELECT {} {}", columns.join(", "), source.from_clause(dialect));

        self.where_clause(&mut sql, query, &source, &mut bindings)?;

        if !query.group_by.is_empty() {
            let groups = query
                .group_by
                .iter()
                .map(|field| scope.column(dialect, field))
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(&format!(" GROUP BY {}", groups.join(", ")));
        }

        if !query.sort.is_empty() {
            let mut terms = vec![];
            for term in &query.sort.fields {
                // Computed projections sort by their label
                let target = match query.projection.as_ref().and_then(|p| p.get(&term.field)) {
                    Some(QueryCall::Field(name)) => scope.column(dialect, name)?,
                    Some(_) => dialect.quote(&term.field),
                    None => scope.column(dialect, &term.field)?,
                };
                terms.push(format!("{target} {}", term.direction.as_sql()));
            }
            sql.push_str(&format!(" ORDER BY {}", terms.join(", ")));
        }

        if let Some(page) = query.page {
            sql = dialect.limit_string(&sql, page.offset(), page.limit(), !query.sort.is_empty());
        }

        Ok(CompiledQuery {
            statement: Statement::new(sql, bindings.into_params()),
            entity,
            relations,
            hidden,
        })
    }

    /// `SELECT COUNT(*) ...` over the rows the query matches, ignoring sort
    /// and page.
    pub fn compile_count(&self, query: &Query) -> Result<Statement> {
        self.validate(query)?;

        let dialect = self.dialect;
        let source = self.source(query)?;
        let mut bindings = Bindings::new();

        let mut inner = source.from_clause(dialect);
        self.where_clause(&mut inner, query, &source, &mut bindings)?;

        let sql = if query.group_by.is_empty() {
            format!("SELECT COUNT(*) {inner}")
        } else {
            let groups = query
                .group_by
                .iter()
                .map(|field| source.scope.column(dialect, field))
                .collect::<Result<Vec<_>>>()?
                .join(", ");
            format!("SELECT COUNT(*) FROM (SELECT {groups} {inner} GROUP BY {groups}) q")
        };

        Ok(Statement::new(sql, bindings.into_params()))
    }

    fn where_clause(
        &self,
        sql: &mut String,
        query: &Query,
        source: &Source,
        bindings: &mut Bindings,
    ) -> Result<()> {
        if let Some(filter) = &query.filter {
            let condition = FilterCompiler::new(self.dialect, &source.scope, bindings).compile(filter)?;
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }
        Ok(())
    }

    fn render_call(&self, scope: &Scope, call: &QueryCall, bindings: &mut Bindings) -> Result<String> {
        match call {
            QueryCall::Field(name) => scope.column(self.dialect, name),
            QueryCall::Value(value) => Ok(bindings.push(value.clone())),
            QueryCall::Agg(AggFunc::Count, args) if args.is_empty() => Ok("count(*)".to_string()),
            QueryCall::Agg(func, args) => {
                let args = self.render_args(scope, args, bindings)?;
                self.dialect.function_string(func.name(), &args)
            }
            QueryCall::Date(func, args) => {
                let args = self.render_args(scope, args, bindings)?;
                self.dialect.function_string(func.name(), &args)
            }
        }
    }

    fn render_args(
        &self,
        scope: &Scope,
        args: &[QueryCall],
        bindings: &mut Bindings,
    ) -> Result<Vec<String>> {
        args.iter()
            .map(|arg| self.render_call(scope, arg, bindings))
            .collect()
    }

    fn labeled(&self, sql: String, label: &str) -> String {
        format!("{sql} AS {}", self.dialect.quote(label))
    }
}
