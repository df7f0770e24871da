//! Layout containers: column, row, form.

use crate::seed::{style, Seed};

/// Children stacked vertically.
pub fn column() -> Seed {
    Seed::new("div")
        .with(style("display", "flex"))
        .with(style("flex-direction", "column"))
}

/// Children laid out horizontally.
pub fn row() -> Seed {
    Seed::new("div")
        .with(style("display", "flex"))
        .with(style("flex-direction", "row"))
}

/// A form: a column whose required inputs are checked by
/// [`Expr::form_valid`](crate::js::Expr::form_valid).
pub fn form() -> Seed {
    Seed::new("form")
        .with(style("display", "flex"))
        .with(style("flex-direction", "column"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::render_to_string;

    #[test]
    fn column_markup() {
        insta::assert_snapshot!(
            render_to_string(&column()),
            @r#"<div id="s1" style="display: flex; flex-direction: column"></div>"#
        );
    }

    #[test]
    fn row_and_form_tags() {
        assert!(render_to_string(&row()).contains("flex-direction: row"));
        assert!(render_to_string(&form()).starts_with("<form id=\"s1\""));
    }
}
