//! Prompts-related command implementations

use anyhow::Result;
use glimpse_core::prompts::default_prompts_dir;
use glimpse_core::{Language, PromptId, PromptLibrary};

/// Show the rendered image-description prompt for a language
pub fn cmd_prompts_show(language: Language) -> Result<()> {
    let mut library = PromptLibrary::new();
    let prompt = library.get(PromptId::DescribeImage)?;

    println!(
        "Prompt: {} (v{}, {})\n",
        prompt.metadata.id,
        prompt.metadata.version,
        if prompt.is_override {
            "custom"
        } else {
            "default"
        }
    );
    if let Some(path) = &prompt.override_path {
        println!("Override: {}\n", path.display());
    }
    println!("{}", "-".repeat(60));
    println!("{}", prompt.render_for_image(language, None));
    println!("{}", "-".repeat(60));

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(dir) => {
            println!("{}", dir.display());
            println!();
            println!("To customize the prompt, create:");
            println!(
                "  {}",
                dir.join(format!("{}.md", PromptId::DescribeImage.as_str()))
                    .display()
            );
        }
        None => println!("(override directory not available on this platform)"),
    }
    Ok(())
}
