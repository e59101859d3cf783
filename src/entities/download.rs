// Model download helper for the NER model.
//
// Downloads bert-base-NER (ONNX export) from HuggingFace into a
// platform-appropriate directory (~/.local/share/shortlist/models/ on Linux)
// so it persists across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// HuggingFace repo for the NER model.
const NER_HF_URL: &str = "https://huggingface.co/protectai/bert-base-NER-onnx/resolve/main";

/// Files for the NER model: (file name, approximate size for display, show progress).
const NER_FILES: [(&str, Option<&str>, bool); 3] = [
    ("config.json", None, false),
    ("tokenizer.json", None, false),
    ("model.onnx", Some("~430 MB"), true),
];

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/shortlist/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shortlist")
        .join("models")
}

/// Subdirectory within model_dir for the NER model.
pub fn ner_model_dir(base: &Path) -> PathBuf {
    base.join("bert-base-NER")
}

/// Check whether the files the tagger needs exist. config.json is optional.
pub fn ner_files_present(base: &Path) -> bool {
    let dir = ner_model_dir(base);
    dir.join("model.onnx").exists() && dir.join("tokenizer.json").exists()
}

/// Download the NER model files, skipping any that already exist.
pub async fn download_model(base: &Path) -> Result<()> {
    let dir = ner_model_dir(base);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nNER model (bert-base-NER):");

    for (file, size, show_progress) in NER_FILES {
        let dest = dir.join(file);
        if dest.exists() {
            info!(file, "NER model file already exists, skipping");
            println!("  {file} (already exists)");
            continue;
        }
        match size {
            Some(size) => println!("  Downloading {file} ({size})..."),
            None => println!("  Downloading {file}..."),
        }
        download_file(&format!("{NER_HF_URL}/{file}"), &dest, show_progress).await?;
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = if show_progress {
        Some(progress_bar(response.content_length()))
    } else {
        None
    };

    // Stream chunks so the progress bar moves during large downloads.
    let mut bytes = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        bytes.extend_from_slice(&chunk);
        if let Some(ref pb) = pb {
            pb.set_position(bytes.len() as u64);
        }
    }

    // Write to a temp name first so an interrupted download isn't mistaken
    // for a complete model on the next run.
    let partial = dest.with_extension("partial");
    std::fs::write(&partial, &bytes)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

fn progress_bar(total_size: Option<u64>) -> ProgressBar {
    match total_size {
        Some(size) => {
            let pb = ProgressBar::new(size);
            if let Ok(style) =
                ProgressStyle::default_bar().template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("    {spinner} {bytes}") {
                pb.set_style(style);
            }
            pb
        }
    }
}
