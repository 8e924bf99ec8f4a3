//! `kiln generate`

use crate::app::{init_service, load_config};
use anyhow::{bail, Result};
use kiln_core::{format_error_for_cli, CodeGenType, GenerationRequest, ProjectEvent};
use tokio::sync::mpsc;

/// Run one generation and print where the files went
pub async fn run(app_id: i64, user_id: i64, code_gen_type: &str, prompt: String) -> Result<()> {
    let code_gen_type: CodeGenType = code_gen_type.parse()?;
    let config = load_config()?;
    let service = init_service(&config).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event);
        }
    });

    let request = GenerationRequest::new(app_id, user_id, prompt, code_gen_type);
    let result = service.generate(request, Some(&tx)).await;
    drop(tx);
    let _ = progress.await;

    match result {
        Ok(outcome) => {
            println!("✅ {}", outcome.code_gen_type.label());
            if !outcome.description.is_empty() {
                println!("   {}", outcome.description);
            }
            println!("   {}", outcome.artifacts.dir.display());
            for file in &outcome.artifacts.files {
                println!("   - {}", file.display());
            }
            Ok(())
        }
        Err(e) => bail!("{}", format_error_for_cli(&e)),
    }
}

fn print_event(event: &ProjectEvent) {
    match event {
        ProjectEvent::Iteration { n } => println!("… step {n}"),
        ProjectEvent::ToolCall { name, .. } => println!("  → {name}"),
        ProjectEvent::ToolResult { name, success, .. } => {
            let mark = if *success { "ok" } else { "failed" };
            println!("  ← {name} {mark}");
        }
        ProjectEvent::UnknownTool { name } => println!("  ⚠ unknown tool {name}"),
        ProjectEvent::Completed { .. } => {}
    }
}
