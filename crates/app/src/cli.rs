//! Command line: a single recipe name.

use std::fmt::Write as _;

use corelib::{CoreError, Recipe};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("no recipe given")]
    MissingRecipe,
    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownRecipe(name) => CliError::UnknownRecipe(name),
        }
    }
}

/// Parse the arguments after the program name. Only the first one is
/// used; the rest are logged and ignored.
pub fn parse_args<I>(args: I) -> Result<Recipe, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let name = args.next().ok_or(CliError::MissingRecipe)?;
    let extra: Vec<String> = args.collect();
    if !extra.is_empty() {
        log::warn!("Ignoring extra arguments: {}", extra.join(" "));
    }
    Ok(name.parse::<Recipe>()?)
}

pub fn usage(exe: &str) -> String {
    let mut out = format!("Usage: {exe} recipe-name\n");
    out.push_str("Recipe names:\n");
    for recipe in Recipe::ALL {
        let _ = writeln!(out, "  {:<15} : {}", recipe.name(), recipe.description());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_recipe_name_parses() {
        for recipe in Recipe::ALL {
            assert_eq!(parse_args(args(&[recipe.name()])), Ok(recipe));
        }
    }

    #[test]
    fn missing_recipe() {
        assert_eq!(parse_args(args(&[])), Err(CliError::MissingRecipe));
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(
            parse_args(args(&["Reflect-Cube"])),
            Err(CliError::UnknownRecipe("Reflect-Cube".into()))
        );
        assert_eq!(
            CliError::UnknownRecipe("x".into()).to_string(),
            "Unknown recipe: x"
        );
    }

    #[test]
    fn extra_arguments_are_ignored() {
        assert_eq!(
            parse_args(args(&["texture", "--fullscreen"])),
            Ok(Recipe::Texture)
        );
    }

    #[test]
    fn usage_lists_every_recipe() {
        let text = usage("texlab");
        assert!(text.starts_with("Usage: texlab recipe-name"));
        for recipe in Recipe::ALL {
            assert!(text.contains(recipe.name()), "{recipe}");
            assert!(text.contains(recipe.description()), "{recipe}");
        }
    }
}
