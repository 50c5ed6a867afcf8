//! Merge command implementation
//!
//! Prints the result of merging a single `-D<key>=<value>` setting into an
//! argument string, without touching any topology.

use anyhow::{Context, Result};
use clap::Args;

use ra_tuner::merge::{ArgumentToken, ValueSyntax};

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Current argument string (may be empty)
    #[arg(allow_hyphen_values = true)]
    pub text: String,

    /// Setting key, without the -D prefix
    pub key: String,

    /// Desired value
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Values an existing token may carry to be replaced (digits, token)
    #[arg(long, value_name = "SYNTAX", default_value = "digits")]
    pub value_syntax: ValueSyntax,

    /// Fail if the merge would change the string
    #[arg(long)]
    pub check: bool,
}

/// Execute the merge command
pub fn execute(args: MergeArgs) -> Result<()> {
    if !args.value_syntax.accepts(&args.value) {
        anyhow::bail!(
            "value '{}' would not be recognised by {} syntax on the next merge; try --value-syntax token",
            args.value,
            args.value_syntax
        );
    }

    let token = ArgumentToken::new(&args.key, args.value_syntax)
        .with_context(|| format!("Invalid key '{}'", args.key))?;
    let merged = token.merge(&args.text, &args.value);
    println!("{}", merged);

    if args.check && merged != args.text {
        anyhow::bail!("argument string would change");
    }
    Ok(())
}
