use anyhow::Result;
use dialoguer::{Input, Select};
use is_terminal::IsTerminal;

use crate::editor::{Confirmation, Decision};

/// Yes/No selection; `default_yes` picks which entry starts highlighted
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&["Yes", "No"])
        .default(if default_yes { 0 } else { 1 })
        .interact()?;

    Ok(selection == 0)
}

/// Ask the user to answer an editor confirmation.
///
/// `assume_yes` answers without asking. Without a terminal and without
/// `assume_yes` the action is refused rather than guessed.
pub fn decide(confirmation: &Confirmation, assume_yes: bool) -> Result<Decision> {
    if assume_yes {
        return Ok(Decision::Confirm);
    }
    if !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "{} needs confirmation; re-run with --yes in non-interactive mode",
            confirmation.title().trim_end_matches('?')
        );
    }

    let prompt = format!("{} {}", confirmation.title(), confirmation.body());
    if prompt_confirmation(&prompt, false)? {
        Ok(Decision::Confirm)
    } else {
        Ok(Decision::Cancel)
    }
}

/// Simple text input prompt with optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_prompt = Input::<String>::new().with_prompt(prompt);

    if let Some(default_val) = default {
        input_prompt = input_prompt.default(default_val.to_string());
    }

    Ok(input_prompt.interact()?)
}
