//! Guided rule creation from templates

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tbr_core::{validator, RuleKind, StoreConfig, Template};

use super::open_store;

/// Template command arguments
#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub action: TemplateAction,
}

/// Template subcommands
#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List available templates
    List,

    /// Generate a pattern from a template
    Generate {
        /// Template name or its number in `template list`
        name: String,

        /// Input substituted into the template
        #[arg(default_value = "")]
        input: String,

        /// Add the generated pattern as a regex rule
        #[arg(long)]
        add: bool,

        /// Add the rule disabled (with --add)
        #[arg(long, requires = "add")]
        disabled: bool,
    },
}

/// Execute template command
pub fn execute(args: TemplateArgs, config: &StoreConfig) -> Result<()> {
    match args.action {
        TemplateAction::List => {
            list_templates();
            Ok(())
        }
        TemplateAction::Generate {
            name,
            input,
            add,
            disabled,
        } => generate(&name, &input, add, disabled, config),
    }
}

/// Find a template by name or 1-based catalog number
pub fn lookup(name: &str) -> Option<&'static Template> {
    Template::find(name).or_else(|| {
        name.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Template::all().get(i))
    })
}

fn list_templates() {
    println!("{}", "Available Rule Templates".cyan().bold());
    println!("{}", "═".repeat(40).cyan());

    for (i, template) in Template::all().iter().enumerate() {
        println!();
        println!("{}. {}", i + 1, template.name.bold());
        println!("   {}", template.description);
        println!("   {}", template.usage.dimmed());
        if template.takes_input() && !template.input_example.is_empty() {
            println!("   Example input: {}", template.input_example.yellow());
        }
        println!("   Preview: {}", template.preview.green());
    }
}

fn generate(name: &str, input: &str, add: bool, disabled: bool, config: &StoreConfig) -> Result<()> {
    let template = lookup(name).with_context(|| format!("Unknown template: {}", name))?;

    if template.takes_input() && input.trim().is_empty() {
        anyhow::bail!(
            "Template '{}' needs an input, e.g. {}",
            template.name,
            template.input_example
        );
    }

    let pattern = template.apply(input.trim());
    let validation = validator::validate(&pattern);
    if !validation.is_valid() {
        println!("{} Invalid pattern: {}", "✗".red(), validation.error());
        anyhow::bail!("Template produced an invalid pattern");
    }

    println!("{}", pattern);

    if add {
        let store = open_store(config)?;
        store
            .add_rule(&pattern, RuleKind::Regex, !disabled)
            .context("Failed to add rule")?;
        println!("{} Added regex rule {}", "✓".green(), pattern.cyan());
    }

    Ok(())
}
