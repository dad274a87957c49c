//! Renders a `TemplateConfig` into a Modal deployment file.
//!
//! The output is plain Python using Modal's public deployment API. Rendering
//! is infallible; all validation happens when the config is assembled.
//!
//! Generated names the user code could shadow (`image`, `app`, ...) are
//! prefixed with `_modal_`, and `app = modal.App(...)` is declared after the
//! embedded source so a user-level `app` never replaces it. A snapshot of the
//! user's globals is taken first so the interface lookup still sees it.

use std::fmt::Write as _;

use crate::domain::template::{RemoteFunctionConfig, TemplateConfig};

/// Python version of the container image.
pub const PYTHON_VERSION: &str = "3.11";

/// Prefix of the generated deployment file name.
pub const OUTPUT_PREFIX: &str = "modal_";

/// Name of the generated ASGI function.
pub const SERVE_FUNCTION: &str = "serve";

const SOURCE_BEGIN: &str = "# ---- begin embedded source";
const SOURCE_END: &str = "# ---- end embedded source";

/// Render the complete deployment file.
#[must_use]
pub fn render(config: &TemplateConfig) -> String {
    let mut out = String::new();
    let (future_imports, body) = if config.mode.serves_gradio() {
        split_future_imports(&config.source)
    } else {
        (String::new(), config.source.clone())
    };
    render_header(&mut out, config, &future_imports);
    render_image(&mut out, config);
    if let Some(nfs) = &config.nfs {
        let _ = writeln!(
            out,
            "_modal_nfs = modal.NetworkFileSystem.from_name({}, create_if_missing=True)\n",
            py_str(&nfs.name)
        );
    }

    if config.mode.serves_gradio() {
        render_embedded_source(&mut out, config, &body);
        out.push_str("_USER_GLOBALS = dict(globals())\n\n");
        render_app(&mut out, config);
        render_gradio_lookup(&mut out, config);
        render_gradio_serve(&mut out, config);
    } else {
        render_notebook_source(&mut out, config);
        render_app(&mut out, config);
        render_marimo_serve(&mut out, config);
    }

    for func in &config.remote_functions {
        render_remote_function(&mut out, config, func);
    }
    out
}

/// File name of the deployment file generated for `stem`.
#[must_use]
pub fn output_file_name(stem: &str) -> String {
    format!("{OUTPUT_PREFIX}{stem}.py")
}

/// Separate module-level `from __future__ import ...` statements from `source`.
///
/// Python only accepts them at the top of a file, so they are emitted before
/// `import modal` and removed from the embedded body. Parenthesised and
/// backslash-continued statements are moved whole.
#[must_use]
pub fn split_future_imports(source: &str) -> (String, String) {
    let mut future = String::new();
    let mut body = String::with_capacity(source.len());
    let mut continuing = false;
    let mut open_parens = false;
    for line in source.split_inclusive('\n') {
        let code = line.trim_end();
        let starts_future = !continuing
            && line.starts_with("from")
            && code
                .split_whitespace()
                .take(3)
                .eq(["from", "__future__", "import"]);
        if continuing || starts_future {
            future.push_str(line);
            if !line.ends_with('\n') {
                future.push('\n');
            }
            if starts_future {
                open_parens = code.contains('(') && !code.contains(')');
            } else if open_parens && code.contains(')') {
                open_parens = false;
            }
            continuing = open_parens || code.ends_with('\\');
        } else {
            body.push_str(line);
        }
    }
    (future, body)
}

/// Single-line form of `s` for use inside a `#` comment.
fn comment_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Quote `s` as a double-quoted Python string literal.
///
/// Backslashes, quotes and control characters are escaped, so the literal
/// stays on one line whatever `s` contains (including `"""`).
#[must_use]
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\U{:08x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn py_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let quoted: Vec<String> = items.into_iter().map(|s| py_str(s.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

// ── Sections ─────────────────────────────────────────────────────────────────

fn render_header(out: &mut String, config: &TemplateConfig, future_imports: &str) {
    let _ = writeln!(
        out,
        "# Generated by gradio-modal {} from {}.",
        env!("CARGO_PKG_VERSION"),
        comment_text(&config.source_name)
    );
    let _ = writeln!(out, "# Deployment mode: {}", config.mode);
    out.push_str("# Deploy with `modal deploy <this file>`. Edits are overwritten on regeneration.\n\n");
    if !future_imports.is_empty() {
        out.push_str(future_imports);
        out.push('\n');
    }
    out.push_str("import modal\n\n");
}

fn render_image(out: &mut String, config: &TemplateConfig) {
    out.push_str("_modal_image = (\n");
    let _ = writeln!(
        out,
        "    modal.Image.debian_slim(python_version={})",
        py_str(PYTHON_VERSION)
    );
    if !config.system_packages.is_empty() {
        let _ = writeln!(out, "    .apt_install({})", py_list(&config.system_packages));
    }
    let _ = writeln!(out, "    .pip_install({})", py_list(config.pip_packages()));
    if !config.env_vars.is_empty() {
        let pairs: Vec<String> = config
            .env_vars
            .iter()
            .map(|(k, v)| format!("{}: {}", py_str(k), py_str(v)))
            .collect();
        let _ = writeln!(out, "    .env({{{}}})", pairs.join(", "));
    }
    out.push_str(")\n\n");
}

fn render_embedded_source(out: &mut String, config: &TemplateConfig, body: &str) {
    let name = comment_text(&config.source_name);
    let _ = writeln!(out, "{SOURCE_BEGIN}: {name} ----");
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(out, "{SOURCE_END}: {name} ----\n");
}

fn render_notebook_source(out: &mut String, config: &TemplateConfig) {
    let _ = writeln!(out, "_NOTEBOOK_NAME = {}", py_str(&config.source_name));
    let _ = writeln!(out, "_NOTEBOOK_SOURCE = {}\n", py_str(&config.source));
}

fn render_app(out: &mut String, config: &TemplateConfig) {
    let _ = writeln!(
        out,
        "app = modal.App({}, image=_modal_image)\n",
        py_str(&config.app_name)
    );
}

fn render_gradio_lookup(out: &mut String, config: &TemplateConfig) {
    let _ = writeln!(out, "_ENTRY_POINTS = {}\n", py_list(config.entry_points()));
    out.push_str(
        r#"
def _is_gradio_interface(value):
    import types

    if isinstance(value, (type, types.ModuleType)):
        return False
    return hasattr(value, "queue") and hasattr(value, "launch")


def _find_gradio_app():
    for name in _ENTRY_POINTS:
        value = _USER_GLOBALS.get(name)
        if value is not None and _is_gradio_interface(value):
            return value

    found = [
        (name, value)
        for name, value in _USER_GLOBALS.items()
        if not name.startswith("_") and _is_gradio_interface(value)
    ]
    if not found:
        raise RuntimeError(
            "No Gradio interface found. Assign it to a global named `demo` "
            "or pass --entry-point when generating this file."
        )
    if len(found) > 1:
        names = ", ".join(name for name, _ in found)
        print(f"Several Gradio interfaces found ({names}); using {found[0][0]!r}")
    return found[0][1]

"#,
    );
}

fn function_decorator(out: &mut String, config: &TemplateConfig) {
    let mut args = Vec::new();
    if let Some(gpu) = &config.gpu {
        args.push(format!("gpu={}", py_str(&gpu.to_string())));
    }
    args.push(format!("timeout={}", config.timeout_secs));
    let limits = &config.limits;
    if limits.min_containers > 0 {
        args.push(format!("min_containers={}", limits.min_containers));
    }
    if let Some(max) = limits.max_containers {
        args.push(format!("max_containers={max}"));
    }
    args.push(format!("scaledown_window={}", limits.scaledown_window_secs));
    if !config.secrets.is_empty() {
        let secrets: Vec<String> = config
            .secrets
            .iter()
            .map(|s| format!("modal.Secret.from_name({})", py_str(s)))
            .collect();
        args.push(format!("secrets=[{}]", secrets.join(", ")));
    }
    if let Some(nfs) = &config.nfs {
        args.push(format!(
            "network_file_systems={{{}: _modal_nfs}}",
            py_str(&nfs.mount_path)
        ));
    }

    out.push_str("@app.function(\n");
    for arg in args {
        let _ = writeln!(out, "    {arg},");
    }
    out.push_str(")\n");
    let _ = writeln!(
        out,
        "@modal.concurrent(max_inputs={})",
        limits.max_concurrent_inputs
    );
    out.push_str("@modal.asgi_app()\n");
}

fn render_gradio_serve(out: &mut String, config: &TemplateConfig) {
    function_decorator(out, config);
    let _ = writeln!(out, "def {SERVE_FUNCTION}():");
    let _ = writeln!(
        out,
        "    from fastapi import FastAPI
    from gradio.routes import mount_gradio_app

    interface = _find_gradio_app()
    interface.queue()
    web_app = FastAPI(title={})
    return mount_gradio_app(app=web_app, blocks=interface, path=\"/\")
",
        py_str(&config.app_name)
    );
}

fn render_marimo_serve(out: &mut String, config: &TemplateConfig) {
    function_decorator(out, config);
    let _ = writeln!(out, "def {SERVE_FUNCTION}():");
    out.push_str(
        "    import pathlib

    import marimo

    notebook = pathlib.Path(\"/root\") / _NOTEBOOK_NAME
    notebook.write_text(_NOTEBOOK_SOURCE)
    server = marimo.create_asgi_app().with_app(path=\"\", root=str(notebook))
    return server.build()

",
    );
}

fn render_remote_function(out: &mut String, config: &TemplateConfig, func: &RemoteFunctionConfig) {
    let mut args = Vec::new();
    if let Some(gpu) = &func.gpu {
        args.push(format!("gpu={}", py_str(&gpu.to_string())));
    }
    args.push(format!("timeout={}", func.timeout_secs));
    if func.keep_warm > 0 {
        args.push(format!("min_containers={}", func.keep_warm));
    }
    if let Some(cron) = &func.schedule {
        args.push(format!("schedule=modal.Cron({})", py_str(cron)));
    }
    if !config.secrets.is_empty() {
        let secrets: Vec<String> = config
            .secrets
            .iter()
            .map(|s| format!("modal.Secret.from_name({})", py_str(s)))
            .collect();
        args.push(format!("secrets=[{}]", secrets.join(", ")));
    }

    let _ = writeln!(out, "\n@app.function({})", args.join(", "));
    let _ = writeln!(out, "def remote_{}(*args, **kwargs):", func.name);
    if config.mode.serves_gradio() {
        let _ = writeln!(
            out,
            "    return _USER_GLOBALS[{}](*args, **kwargs)",
            py_str(&func.name)
        );
    } else {
        // Notebook sources are not importable here; execute them to reach the function.
        let _ = writeln!(
            out,
            "    namespace = {{}}\n    exec(compile(_NOTEBOOK_SOURCE, _NOTEBOOK_NAME, \"exec\"), namespace)\n    return namespace[{}](*args, **kwargs)",
            py_str(&func.name)
        );
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
