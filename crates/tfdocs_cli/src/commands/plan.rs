//! Plan command - show what the action would run.

use anyhow::Result;
use clap::Args;

use tfdocs_core::{Action, ActionConfig, ActionPlan};

use super::GlobalArgs;

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(globals: &GlobalArgs, args: PlanArgs) -> Result<()> {
    let host = globals.host()?;
    let action = Action::new(ActionConfig::from_env(), host, globals.runner())
        .with_terraform_docs_binary(&globals.terraform_docs_bin);

    let plan = action.plan()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_text(&plan));
    }

    Ok(())
}

/// Human-readable plan: one copy-pasteable command line per directory.
fn render_text(plan: &ActionPlan) -> String {
    let mut out = format!("Workspace: {}\n", plan.workspace.display());
    out.push_str(&format!("Directories from {}:\n", plan.strategy));

    if plan.commands.is_empty() {
        out.push_str("  (none)\n");
    }
    for command in &plan.commands {
        let line = shell_words::join(
            std::iter::once(command.program.as_str()).chain(command.args.iter().map(String::as_str)),
        );
        out.push_str(&format!("  {}\n", line));
    }

    if plan.config.git.push {
        out.push_str(&format!(
            "Changes will be committed as {:?} and pushed\n",
            plan.config.git.commit_message
        ));
    } else if plan.config.fail_on_diff {
        out.push_str("Changes will fail the run\n");
    }
    out
}
