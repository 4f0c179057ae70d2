//! `ddk templates` and `ddk generate`.

use super::Context;
use anyhow::{bail, Context as _, Result};
use ddk_schedule::{
    builtin_templates, load_template_file, GeneratedReminder, ReminderGenerator,
    TemplateDefinition,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where `ddk generate` takes its template from.
pub enum Source {
    Key(String),
    File(PathBuf),
}

struct CatalogEntry {
    key: String,
    origin: String,
    template: TemplateDefinition,
}

/// Built-ins (when enabled) followed by configured files, keyed by file stem.
fn catalog(ctx: &Context) -> Result<Vec<CatalogEntry>> {
    let mut out: Vec<CatalogEntry> = Vec::new();

    if ctx.config.include_builtin_templates {
        for (key, template) in builtin_templates() {
            out.push(CatalogEntry {
                key: key.to_string(),
                origin: "builtin".to_string(),
                template,
            });
        }
    }

    for path in &ctx.config.template_paths {
        let key = file_key(path)?;
        if out.iter().any(|e| e.key == key) {
            bail!(
                "duplicate template key '{key}' from {}. rename the file",
                path.display()
            );
        }
        let template = load_template_file(path)
            .with_context(|| format!("load template failed: {}", path.display()))?;
        out.push(CatalogEntry {
            key,
            origin: path.display().to_string(),
            template,
        });
    }

    Ok(out)
}

fn file_key(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("template path has no usable file name: {}", path.display()))
}

pub fn list(ctx: &Context) -> Result<()> {
    let entries = catalog(ctx)?;
    println!("templates={}", entries.len());
    for e in entries {
        println!(
            "key={} source={} items={} name={}",
            e.key,
            e.origin,
            e.template.items.len(),
            e.template.name
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    template: &'a str,
    year: i32,
    reminders: &'a [GeneratedReminder],
}

pub fn generate(ctx: &Context, source: Source, year: i32, json: bool) -> Result<()> {
    let template = match source {
        Source::File(path) => load_template_file(&path)
            .with_context(|| format!("load template failed: {}", path.display()))?,
        Source::Key(key) => {
            let entries = catalog(ctx)?;
            let known: Vec<String> = entries.iter().map(|e| e.key.clone()).collect();
            match entries.into_iter().find(|e| e.key == key) {
                Some(e) => e.template,
                None => bail!(
                    "unknown template '{}'. expected one of: {}",
                    key,
                    known.join(" | ")
                ),
            }
        }
    };

    let generator = ReminderGenerator::new(ctx.business_days());
    let reminders = generator.generate(&template, year)?;

    if json {
        let out = GenerateOutput {
            template: &template.name,
            year,
            reminders: &reminders,
        };
        let s = serde_json::to_string_pretty(&out).context("serialize reminders failed")?;
        println!("{s}");
        return Ok(());
    }

    println!(
        "template={} year={} reminders={}",
        template.name,
        year,
        reminders.len()
    );
    for r in &reminders {
        let original = r
            .original_deadline
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!(
            "deadline={} original_deadline={} priority={} category={} title={}",
            r.deadline, original, r.priority, r.category, r.title
        );
    }
    Ok(())
}
