use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use shortlist::config::{Config, NerBackend, SpellDictionary};
use shortlist::entities::heuristic::HeuristicNameRecognizer;
use shortlist::entities::onnx::OnnxNerTagger;
use shortlist::entities::traits::NameRecognizer;
use shortlist::entities::{download, extract_entities};
use shortlist::ingest::{self, ResumeFile};
use shortlist::job::JobProfile;
use shortlist::ocr::spell::SpellCorrector;
use shortlist::ocr::traits::OcrEngine;
use shortlist::output::json::{write_report, OutputFormat};
use shortlist::output::terminal;
use shortlist::pipeline::{self, ScreenOptions};
use shortlist::scoring::vocabulary::SynonymMap;
use shortlist::scoring::{score_corpus, suggest::suggest_keywords, VocabularyMode};
use shortlist::text::{clean_extracted_text, preprocess_text};

/// Shortlist: OCR-driven resume screening.
///
/// Reads resume scans, extracts contact details, and ranks candidates by
/// TF-IDF similarity to a job description.
#[derive(Parser)]
#[command(name = "shortlist", version, about)]
struct Cli {
    /// Write logs to this file (truncated each run) instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a folder of resumes against a job profile
    Screen {
        /// Folder containing resume images (.jpg/.jpeg/.png) or .txt files
        #[arg(long)]
        resumes: PathBuf,

        /// Job profile JSON (title, description, keywords)
        #[arg(long)]
        job: PathBuf,

        /// Where to write ranked results
        #[arg(long, default_value = "results/ranked_resumes.json")]
        output: PathBuf,

        /// Output file format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// TF-IDF vocabulary: the job's keywords, or every word in the corpus
        #[arg(long, value_enum, default_value = "controlled")]
        vocabulary: VocabularyMode,

        /// Only keep the N best-ranked resumes
        #[arg(long)]
        top: Option<usize>,

        /// Also look in subfolders
        #[arg(long)]
        recursive: bool,
    },

    /// OCR one resume and show the extracted text and contact details
    Inspect {
        /// Resume image or .txt file
        file: PathBuf,

        /// Also score the resume against this job profile
        #[arg(long)]
        job: Option<PathBuf>,
    },

    /// Suggest TF-IDF keywords from a job description
    Keywords {
        /// Job profile JSON
        #[arg(long)]
        job: PathBuf,

        /// Number of keywords to suggest (default: 20)
        #[arg(long, default_value = "20")]
        count: usize,
    },

    /// Download the NER model used for name extraction (~430 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Screen {
            resumes,
            job,
            output,
            format,
            vocabulary,
            top,
            recursive,
        } => {
            let config = Config::load()?;
            config.require_ner()?;
            let job = JobProfile::load(&job)?;
            let files = ingest::discover(&resumes, recursive)?;
            if files.is_empty() {
                anyhow::bail!(
                    "No resumes (.jpg, .jpeg, .png, .txt) found in {}",
                    resumes.display()
                );
            }
            println!("Screening {} resumes from {}...", files.len(), resumes.display());

            let engine = build_ocr_engine(&config);
            let recognizer = build_recognizer(&config)?;
            let speller = build_speller(&config)?;
            let options = ScreenOptions {
                vocabulary_mode: vocabulary,
                top,
                retry_policy: config.retry_policy(),
                show_progress: true,
            };

            // OCR and inference are CPU-bound; keep them off the async runtime.
            let report = tokio::task::spawn_blocking(move || {
                pipeline::screen(
                    &files,
                    &job,
                    &options,
                    engine.as_ref(),
                    recognizer.as_ref(),
                    &speller,
                )
            })
            .await
            .context("Screening task panicked")??;

            write_report(&report, &output, format)?;
            terminal::display_report(&report);
            println!(
                "{} Results saved to {}",
                "Screening complete.".green().bold(),
                output.display()
            );
        }

        Commands::Inspect { file, job } => {
            let config = Config::load()?;
            config.require_ner()?;
            let resume = ResumeFile::from_path(&file)?;
            let job = job.as_deref().map(JobProfile::load).transpose()?;

            let engine = build_ocr_engine(&config);
            let recognizer = build_recognizer(&config)?;
            let speller = build_speller(&config)?;
            let policy = config.retry_policy();

            let (extracted, entities, score) = tokio::task::spawn_blocking(move || -> Result<_> {
                let extracted =
                    pipeline::extract_text(&resume, engine.as_ref(), &policy, &speller)?;
                let entities = extract_entities(&extracted.raw_text, recognizer.as_ref());
                let score = match &job {
                    Some(job) => Some(score_against(job, &extracted.normalized)?),
                    None => None,
                };
                Ok((extracted, entities, score))
            })
            .await
            .context("Inspection task panicked")??;

            terminal::display_inspection(
                &extracted.filename,
                &extracted.raw_text,
                extracted.confidence,
                extracted.attempts,
                &entities,
                score,
            );
        }

        Commands::Keywords { job, count } => {
            let job = JobProfile::load(&job)?;
            let keywords = suggest_keywords(&job.description, count)?;
            terminal::display_keywords(&keywords);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            println!("Downloading NER model to {}...", config.model_dir.display());
            download::download_model(&config.model_dir).await?;
            println!(
                "\n{}",
                "Model ready. Names will now be extracted with the NER model.".green()
            );
        }
    }

    Ok(())
}

/// Set up structured logging to stderr, or to a fresh file when given.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shortlist=info"))
    };

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Tesseract when built with the `ocr` feature, otherwise an engine that
/// fails every image so text resumes still go through.
#[cfg(feature = "ocr")]
fn build_ocr_engine(config: &Config) -> Box<dyn OcrEngine> {
    Box::new(shortlist::ocr::tesseract::TesseractEngine::new(
        config.tessdata_dir.clone(),
        &config.ocr_language,
    ))
}

#[cfg(not(feature = "ocr"))]
fn build_ocr_engine(_config: &Config) -> Box<dyn OcrEngine> {
    tracing::warn!("Built without OCR support; image resumes will be skipped");
    Box::new(shortlist::ocr::traits::UnavailableEngine)
}

fn build_recognizer(config: &Config) -> Result<Box<dyn NameRecognizer>> {
    match config.resolved_ner_backend() {
        NerBackend::Onnx => {
            let dir = download::ner_model_dir(&config.model_dir);
            info!(dir = %dir.display(), "Using ONNX NER model for names");
            Ok(Box::new(OnnxNerTagger::load(&dir)?))
        }
        _ => {
            info!("Using heuristic name recognizer");
            Ok(Box::new(HeuristicNameRecognizer::default()))
        }
    }
}

fn build_speller(config: &Config) -> Result<SpellCorrector> {
    match &config.spell_dictionary {
        SpellDictionary::Bundled => SpellCorrector::bundled(),
        SpellDictionary::Off => Ok(SpellCorrector::disabled()),
        SpellDictionary::File(path) => SpellCorrector::from_dictionary(path),
    }
}

/// Score one normalized resume against a job on its own.
fn score_against(job: &JobProfile, normalized: &str) -> Result<f64> {
    let keywords = job.effective_keywords(VocabularyMode::Controlled)?;
    let synonyms = SynonymMap::new(&job.synonyms);
    let job_text = preprocess_text(&clean_extracted_text(&job.description));
    let scored = score_corpus(
        &job_text,
        &[normalized.to_string()],
        VocabularyMode::Controlled,
        &keywords,
        &synonyms,
    );
    Ok(scored.scores.first().copied().unwrap_or(0.0))
}
