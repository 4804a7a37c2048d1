//! `agentme persona ...`: the creation wizard and persona management.

use agentme_core::persona::{
    Industry, Persona, PersonaDraft, PersonaStore, Tone, find_job_preset, job_presets,
};
use anyhow::{Result, anyhow, bail};
use clap::Args;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::context::AppContext;

/// Fields for `persona create`. Anything left out is asked for interactively.
#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Start from a job preset (see `agentme persona presets`)
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub purpose: Option<String>,

    #[arg(long)]
    pub target_user: Option<String>,

    /// One of the listed industries, or any free-text field
    #[arg(long)]
    pub industry: Option<String>,

    /// professional, creative, analytical or concise
    #[arg(long)]
    pub tone: Option<Tone>,
}

pub async fn create(ctx: &AppContext, args: CreateArgs) -> Result<()> {
    let mut draft = initial_draft(&args)?;

    if needs_input(&draft) {
        let mut wizard = Wizard::new()?;
        wizard.fill(&mut draft)?;
    }

    draft.validate()?;
    let persona = ctx.personas.save(draft).await?;

    println!(
        "{}",
        format!("✅ Created persona '{}' ({})", persona.name, persona.id).green()
    );
    println!("{}", "It is now the current persona.".bright_black());
    Ok(())
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let personas = ctx.personas.list_all().await;
    if personas.is_empty() {
        println!(
            "{}",
            "No personas yet. Create one with `agentme persona create`.".bright_black()
        );
        return Ok(());
    }

    let current_id = ctx.personas.get_current().await.map(|p| p.id);
    for persona in &personas {
        let is_current = current_id.as_deref() == Some(persona.id.as_str());
        println!("{}", list_line(persona, is_current));
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: Option<&str>) -> Result<()> {
    let persona = ctx.resolve_persona(id).await?;

    println!("{}", persona.name.bright_magenta().bold());
    println!("  {:<12} {}", "id".bright_black(), persona.id);
    println!("  {:<12} {}", "purpose".bright_black(), persona.purpose);
    println!("  {:<12} {}", "target user".bright_black(), persona.target_user);
    println!("  {:<12} {}", "industry".bright_black(), persona.industry);
    println!("  {:<12} {}", "tone".bright_black(), tone_display(&persona));
    println!(
        "  {:<12} {}",
        "created".bright_black(),
        persona.created.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

pub async fn select(ctx: &AppContext, id: &str) -> Result<()> {
    let persona = ctx.resolve_persona(Some(id)).await?;
    ctx.personas.set_current(Some(&persona)).await?;

    println!("{}", format!("Now chatting as '{}'", persona.name).green());
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    let persona = ctx.resolve_persona(Some(id)).await?;
    let current = ctx.personas.delete_and_reassign(&persona.id).await?;

    println!("{}", format!("🗑  Deleted '{}'", persona.name).yellow());
    match current {
        Some(current) => println!(
            "{}",
            format!("Current persona: {}", current.name).bright_black()
        ),
        None => println!("{}", "No persona is selected now.".bright_black()),
    }
    Ok(())
}

pub fn presets() {
    for preset in job_presets() {
        println!(
            "{:<10} {}  {}",
            preset.id.bright_cyan(),
            preset.title.bold(),
            preset.description.bright_black()
        );
    }
}

/// Builds the draft from the preset and the flags given on the command line.
fn initial_draft(args: &CreateArgs) -> Result<PersonaDraft> {
    let mut draft = match args.preset.as_deref() {
        Some(id) => find_job_preset(id)
            .map(|preset| preset.to_draft())
            .ok_or_else(|| {
                let ids: Vec<&str> = job_presets().iter().map(|p| p.id).collect();
                anyhow!("Unknown preset '{id}'. Available: {}", ids.join(", "))
            })?,
        None => PersonaDraft::default(),
    };

    if let Some(name) = &args.name {
        draft.name = name.clone();
    }
    if let Some(purpose) = &args.purpose {
        draft.purpose = purpose.clone();
    }
    if let Some(target_user) = &args.target_user {
        draft.target_user = target_user.clone();
    }
    if let Some(industry) = &args.industry {
        draft.industry = Industry::from_label(industry);
    }
    if args.tone.is_some() {
        draft.tone = args.tone;
    }

    Ok(draft)
}

fn needs_input(draft: &PersonaDraft) -> bool {
    draft.name.trim().is_empty()
        || draft.purpose.trim().is_empty()
        || draft.target_user.trim().is_empty()
        || draft.industry.label().trim().is_empty()
        || draft.tone.is_none()
}

/// Accepts a 1-based index into [`Tone::ALL`] or a tone name.
fn parse_tone_choice(input: &str) -> Option<Tone> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| Tone::ALL.get(i).copied());
    }
    input.parse().ok()
}

/// Accepts a 1-based index into [`Industry::KNOWN`] or any non-empty label.
fn parse_industry_choice(input: &str) -> Option<Industry> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(index) = input.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| Industry::KNOWN.get(i).cloned());
    }
    Some(Industry::from_label(input))
}

fn tone_display(persona: &Persona) -> String {
    match (persona.tone, persona.unknown_tone.as_deref()) {
        (Some(tone), _) => format!("{} ({})", tone.label(), tone.as_str()),
        (None, Some(label)) => label.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn list_line(persona: &Persona, is_current: bool) -> String {
    let marker = if is_current { "*" } else { " " };
    format!(
        "{marker} {}  {}  [{} / {}]",
        persona.id,
        persona.name,
        persona.industry,
        persona
            .tone
            .map(|t| t.as_str())
            .or(persona.unknown_tone.as_deref())
            .unwrap_or("-")
    )
}

/// Line-by-line prompts for the fields still missing from a draft.
struct Wizard {
    editor: DefaultEditor,
}

impl Wizard {
    fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    fn fill(&mut self, draft: &mut PersonaDraft) -> Result<()> {
        println!("{}", "=== New persona ===".bright_magenta().bold());

        if draft.name.trim().is_empty() {
            draft.name = self.ask_text("Name")?;
        }
        if draft.purpose.trim().is_empty() {
            draft.purpose = self.ask_text("Purpose")?;
        }
        if draft.target_user.trim().is_empty() {
            draft.target_user = self.ask_text("Target user")?;
        }
        if draft.industry.label().trim().is_empty() {
            draft.industry = self.ask_industry()?;
        }
        if draft.tone.is_none() {
            draft.tone = Some(self.ask_tone()?);
        }
        Ok(())
    }

    fn ask_text(&mut self, label: &str) -> Result<String> {
        loop {
            let answer = self.read(&format!("{label}: "))?;
            if !answer.trim().is_empty() {
                return Ok(answer.trim().to_string());
            }
            println!("{}", format!("{label} is required.").yellow());
        }
    }

    fn ask_industry(&mut self) -> Result<Industry> {
        for (i, industry) in Industry::KNOWN.iter().enumerate() {
            println!("  {}. {}", i + 1, industry);
        }
        loop {
            let answer = self.read("Industry (number or your own field): ")?;
            if let Some(industry) = parse_industry_choice(&answer) {
                return Ok(industry);
            }
            println!("{}", "Pick a number from the list or type a field.".yellow());
        }
    }

    fn ask_tone(&mut self) -> Result<Tone> {
        for (i, tone) in Tone::ALL.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                tone.label(),
                format!("- {}", tone.summary()).bright_black()
            );
        }
        loop {
            let answer = self.read("Tone: ")?;
            if let Some(tone) = parse_tone_choice(&answer) {
                return Ok(tone);
            }
            println!("{}", "Pick a number from the list.".yellow());
        }
    }

    fn read(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                bail!("Persona creation cancelled")
            }
            Err(err) => Err(err.into()),
        }
    }
}
