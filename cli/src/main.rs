//! KangSantri AI CLI - binary entry point.
//!
//! Wires the state core ([`santri_store::AppState`]) to a file-backed
//! key-value store under the data directory and dispatches one subcommand
//! per invocation. Provider calls go through the placeholder generator until
//! real network clients are wired in.
//!
//! ```text
//! main() -> init_tracing() -> AppState::load(FileStore) -> run()
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use santri_providers::PlaceholderGenerator;
use santri_store::{AppState, FileStore, SantriConfig};
use santri_types::{KeyId, Preset, ProjectId, Provider, Theme};

fn init_tracing(data_dir: &std::path::Path) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    match open_log_file(data_dir) {
        Some((log_path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %log_path.display(), "Logging initialized");
        }
        // If we can't open a log file, prefer "no logs" over mixing log
        // lines into the command output.
        None => tracing_subscriber::registry().with(env_filter).init(),
    }
}

fn open_log_file(data_dir: &std::path::Path) -> Option<(PathBuf, std::fs::File)> {
    let path = data_dir.join("logs").join("santri.log");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    Some((path, file))
}

fn usage() -> &'static str {
    "KangSantri AI

Usage: santri <command>

  status                             ringkasan provider, model, dan kunci aktif
  theme toggle                       ganti tema terang/gelap

  keys add <provider> <label> <key>  tambah kunci API
  keys list [provider]               daftar kunci API
  keys use <provider> <key-id>       jadikan kunci sebagai default
  keys rm <provider> <key-id>        hapus kunci API

  provider use <provider>            pilih provider aktif (gemini | openrouter)
  model set <provider> <model>       atur model default provider
  endpoint set <provider> <url>      atur endpoint khusus (hanya openrouter)

  preset use <preset>                pilih preset (default | ustadz | koding)
  params show                        tampilkan parameter chat
  params set <field> <value>         temperature | top-p | max-tokens | model | system-prompt

  chat <pesan...>                    kirim pesan chat
  image <prompt...>                  generate gambar
  history show                       tampilkan transkrip
  history clear                      kosongkan transkrip

  project add <name> <file>          simpan kode dari file
  project list                       daftar kode tersimpan
  project rm <project-id>            hapus kode tersimpan"
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match SantriConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Peringatan: konfigurasi di {} diabaikan: {e}", e.path().display());
            SantriConfig::default()
        }
    };

    let data_dir = config
        .data_dir()
        .context("tidak dapat menentukan direktori data (HOME tidak ditemukan)")?;
    init_tracing(&data_dir);

    let theme_fallback = config
        .app
        .as_ref()
        .and_then(|app| app.theme.as_deref())
        .and_then(|raw| Theme::parse(raw).ok())
        .unwrap_or_default();

    let store = FileStore::open(&data_dir)
        .with_context(|| format!("tidak dapat membuka direktori data {}", data_dir.display()))?;
    let mut state = AppState::load_with_theme_fallback(store, theme_fallback);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
    run(&mut state, &argv).await
}

async fn run(state: &mut AppState<FileStore>, argv: &[&str]) -> Result<()> {
    match argv {
        [] | ["help"] | ["--help"] => println!("{}", usage()),

        ["status"] => print_status(state),

        ["theme", "toggle"] => {
            let theme = state.toggle_theme();
            println!("Tema sekarang: {}", theme.as_str());
        }

        ["keys", "add", provider, label, key] => {
            let provider = Provider::parse(provider)?;
            let id = state.add_api_key(provider, *label, *key);
            println!("Kunci '{label}' ditambahkan ke {provider} (id: {id})");
        }
        ["keys", "list"] => {
            for provider in Provider::all() {
                print_keys(state, *provider);
            }
        }
        ["keys", "list", provider] => print_keys(state, Provider::parse(provider)?),
        ["keys", "use", provider, id] => {
            let provider = Provider::parse(provider)?;
            state.set_active_api_key(provider, &KeyId::from_raw(*id));
            println!("Kunci default {provider} diperbarui");
        }
        ["keys", "rm", provider, id] => {
            let provider = Provider::parse(provider)?;
            state.delete_api_key(provider, &KeyId::from_raw(*id));
            println!("Kunci dihapus dari {provider}");
        }

        ["provider", "use", provider] => {
            let provider = Provider::parse(provider)?;
            state.set_active_provider(provider);
            println!(
                "Provider aktif: {} (model: {})",
                provider.display_name(),
                state.effective_model()
            );
        }
        ["model", "set", provider, model] => {
            let provider = Provider::parse(provider)?;
            state.update_provider_default_model(provider, *model);
            println!("Model default {provider}: {model}");
        }
        ["endpoint", "set", provider, url] => {
            let provider = Provider::parse(provider)?;
            if !provider.supports_custom_endpoint() {
                bail!("{provider} tidak mendukung endpoint khusus");
            }
            state.update_provider_endpoint(provider, *url);
            println!("Endpoint {provider}: {url}");
        }

        ["preset", "use", preset] => {
            let preset = Preset::parse(preset)?;
            state.set_preset(preset);
            println!("Preset aktif: {}", preset.display_name());
        }

        ["params", "show"] => print_params(state),
        ["params", "set", field, value] => set_param(state, field, value)?,

        ["chat", text @ ..] if !text.is_empty() => {
            let generator = PlaceholderGenerator::new(state.active_provider());
            match state.send_message(&generator, &text.join(" "), None).await {
                Some(reply) => println!("{}", reply.text),
                None => bail!("pesan kosong"),
            }
        }

        ["image", prompt @ ..] if !prompt.is_empty() => {
            let generator = PlaceholderGenerator::new(state.active_provider());
            let images = state
                .generate_images(&generator, &prompt.join(" "), None, None, 1)
                .await?;
            for (index, image) in images.iter().enumerate() {
                println!("Gambar {}: {} karakter base64", index + 1, image.0.len());
            }
        }

        ["history", "show"] => {
            for message in state.messages() {
                let who = match message.sender {
                    santri_types::Sender::User => "anda",
                    santri_types::Sender::Ai => "ai",
                };
                println!("[{}] {who}: {}", message.timestamp.format("%Y-%m-%d %H:%M"), message.text);
            }
        }
        ["history", "clear"] => {
            state.clear_transcript();
            println!("Transkrip dikosongkan");
        }

        ["project", "add", name, file] => {
            let code = fs::read_to_string(file)
                .with_context(|| format!("tidak dapat membaca {file}"))?;
            let id = state.add_code_project(*name, code);
            println!("Kode '{name}' disimpan (id: {id})");
        }
        ["project", "list"] => {
            for project in state.code_projects() {
                println!(
                    "{}  {}  (diubah {})",
                    project.id,
                    project.name,
                    project.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        ["project", "rm", id] => {
            state.delete_code_project(&ProjectId::from_raw(*id));
            println!("Kode dihapus");
        }

        _ => bail!("perintah tidak dikenal; jalankan `santri help`"),
    }
    Ok(())
}

fn print_status(state: &AppState<FileStore>) {
    let provider = state.active_provider();
    let settings = state.api_settings().get(provider);
    println!("Provider aktif : {}", provider.display_name());
    println!("Model chat     : {}", state.effective_model());
    println!("Preset         : {}", state.preset().display_name());
    println!("Tema           : {}", state.theme().as_str());
    match settings.active_key() {
        Some(entry) => println!("Kunci aktif    : {} ({})", entry.label, entry.id),
        None => println!("Kunci aktif    : belum diatur"),
    }
}

fn print_keys(state: &AppState<FileStore>, provider: Provider) {
    let settings = state.api_settings().get(provider);
    println!("{} (model default: {}):", provider.display_name(), settings.default_model);
    if settings.api_keys.is_empty() {
        println!("  (belum ada kunci)");
        return;
    }
    for entry in &settings.api_keys {
        let marker = if entry.is_default { "*" } else { " " };
        println!("  {marker} {}  {}", entry.id, entry.label);
    }
}

fn print_params(state: &AppState<FileStore>) {
    let params = state.chat_params();
    println!("model         : {}", state.effective_model());
    println!(
        "system prompt : {}",
        params.system_prompt.as_deref().unwrap_or("(preset)")
    );
    println!(
        "temperature   : {}",
        params.temperature.map_or("-".to_string(), |t| t.to_string())
    );
    println!(
        "top_p         : {}",
        params.top_p.map_or("-".to_string(), |p| p.to_string())
    );
    println!(
        "max_tokens    : {}",
        params.max_tokens.map_or("-".to_string(), |n| n.to_string())
    );
}

fn set_param(state: &mut AppState<FileStore>, field: &str, value: &str) -> Result<()> {
    let result = match field {
        "temperature" => {
            let t: f32 = value.parse().context("temperature harus berupa angka")?;
            state.update_chat_params(|params| params.temperature = Some(t))
        }
        "top-p" => {
            let p: f32 = value.parse().context("top-p harus berupa angka")?;
            state.update_chat_params(|params| params.top_p = Some(p))
        }
        "max-tokens" => {
            let n: u32 = value.parse().context("max-tokens harus berupa bilangan bulat")?;
            state.update_chat_params(|params| params.max_tokens = Some(n))
        }
        "model" => state.update_chat_params(|params| params.model = Some(value.to_string())),
        "system-prompt" => {
            state.update_chat_params(|params| params.system_prompt = Some(value.to_string()))
        }
        other => bail!("parameter tidak dikenal: {other}"),
    };
    result?;
    println!("Parameter {field} diperbarui");
    Ok(())
}
