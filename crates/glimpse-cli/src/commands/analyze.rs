//! Image analysis command

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use glimpse_core::{
    AnalysisReport, AnalysisResult, AnalysisSession, AttemptOutcome, ImageInput, Language,
    VisionBackend,
};

use super::render::format_result;
use super::{build_client, load_settings, settings_path};

/// Options for `glimpse analyze`
pub struct AnalyzeOptions<'a> {
    pub image: &'a Path,
    pub language: Option<Language>,
    pub backend: Option<&'a str>,
    pub model: Option<&'a str>,
    pub hint: Option<&'a str>,
    pub json: bool,
    pub yes: bool,
}

pub async fn cmd_analyze(settings_file: Option<&Path>, opts: AnalyzeOptions<'_>) -> Result<()> {
    let settings = load_settings(&settings_path(settings_file)?)?;
    let language = opts.language.unwrap_or(settings.language);
    let messages = language.messages();

    let image = ImageInput::from_path(opts.image)
        .with_context(|| format!("Failed to read image: {}", opts.image.display()))?;

    let mut client = build_client(&settings, opts.backend)?;
    if let Some(model) = opts.model {
        client = client.with_model(model);
    }

    tracing::debug!(
        backend = client.host(),
        model = client.model(),
        language = %language,
        "Using vision backend"
    );

    let mut session = AnalysisSession::new(language);
    if let Some(hint) = opts.hint {
        session = session.with_hint(hint);
    }

    if !opts.json {
        println!("🔍 {}\n", messages.analyzing);
    }

    let yes = opts.yes;
    let result = run_session(&client, &image, &mut session, |attempts_left| {
        if yes {
            return Ok(true);
        }
        confirm_retry(language, attempts_left)
    })
    .await?;

    match result {
        Some(result) => {
            if opts.json {
                let report = AnalysisReport {
                    result,
                    model: client.model().to_string(),
                    language,
                    image_hash: image.content_hash(),
                    attempts: session.attempts(),
                    analyzed_at: chrono::Utc::now(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_result(&result, language));
            }
            Ok(())
        }
        None if session.can_retry() => bail!("Analysis abandoned"),
        None => bail!("{}", messages.attempts_exhausted),
    }
}

/// Drive a session until a usable result, abandonment, or exhaustion
///
/// `confirm` is asked before every retry with the number of attempts left
/// and returns whether to continue. `Ok(None)` means no usable result.
pub async fn run_session<B, F>(
    backend: &B,
    image: &ImageInput,
    session: &mut AnalysisSession,
    mut confirm: F,
) -> Result<Option<AnalysisResult>>
where
    B: VisionBackend + ?Sized,
    F: FnMut(u32) -> Result<bool>,
{
    let language = session.language();

    loop {
        match session.attempt(backend, image).await {
            AttemptOutcome::Ready(result) => return Ok(Some(result)),
            AttemptOutcome::Failed {
                reason,
                attempts_left,
            } => {
                eprintln!("❌ {}", reason.message(language));
                if attempts_left == 0 || !confirm(attempts_left)? {
                    return Ok(None);
                }
            }
            AttemptOutcome::Exhausted | AttemptOutcome::Completed => return Ok(None),
        }
    }
}

/// Ask whether to retry on stdin
///
/// The prompt goes to stderr; stdout carries only the result.
fn confirm_retry(language: Language, attempts_left: u32) -> Result<bool> {
    prompt_retry(
        language,
        attempts_left,
        &mut io::stdin().lock(),
        &mut io::stderr(),
    )
}

/// Write the retry prompt to `out` and read a `y`/`N` answer from `input`
pub fn prompt_retry<R: BufRead, W: Write>(
    language: Language,
    attempts_left: u32,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    write!(
        out,
        "{} ({}/{}) [y/N] ",
        language.messages().retry_prompt,
        attempts_left,
        glimpse_core::MAX_ATTEMPTS
    )?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
