use d7amux_engine::NlsMethod;
use d7amux_session::PayloadBudget;
use serde::Serialize;

use crate::cmd::BudgetArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_records, OutputFormat, Render};

#[derive(Debug, Serialize)]
struct BudgetRow {
    method: &'static str,
    overhead: usize,
    max_payload: usize,
}

impl Render for BudgetRow {
    fn headers() -> Vec<&'static str> {
        vec!["METHOD", "OVERHEAD", "MAX PAYLOAD"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.method.to_string(),
            self.overhead.to_string(),
            self.max_payload.to_string(),
        ]
    }

    fn pretty(&self) -> String {
        format!(
            "method={} overhead={} max_payload={}",
            self.method, self.overhead, self.max_payload
        )
    }
}

pub fn run(args: BudgetArgs, format: OutputFormat) -> CliResult<i32> {
    let budget = PayloadBudget::new(args.max_payload)
        .map_err(|err| CliError::new(USAGE, format!("invalid --max-payload: {err}")))?;
    let rows = budget_rows(&budget, args.method);
    print_records(&rows, format);
    Ok(SUCCESS)
}

fn budget_rows(budget: &PayloadBudget, only: Option<NlsMethod>) -> Vec<BudgetRow> {
    NlsMethod::ALL
        .into_iter()
        .filter(|method| only.is_none_or(|wanted| wanted == *method))
        .map(|method| BudgetRow {
            method: method.name(),
            overhead: method.overhead(),
            max_payload: budget.max_payload(method),
        })
        .collect()
}
