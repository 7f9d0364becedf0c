use crate::args::RowsArgs;
use crate::commands::{load_dashboard, Out, Rows};
use crate::source::SourceKind;
use crate::{Config, Result};

/// Loads the data and prints the joined table, narrowed by the name and amount filters.
pub async fn rows(config: Config, kind: SourceKind, args: RowsArgs) -> Result<Out<Rows>> {
    let dashboard = load_dashboard(&config, kind, args.filter().into()).await?;
    let rows = dashboard.rows();
    let message = format!(
        "{} row{} from the {kind} source",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, Rows::new(rows, args.format())?))
}
