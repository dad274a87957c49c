//! Deployment modes and the container image recipe each one selects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::TemplateError;
use crate::domain::gpu::{GpuKind, GpuSpec};

const GRADIO_BASE: &[&str] = &["gradio", "fastapi[standard]", "uvicorn"];

const ML_STACK: &[&str] = &[
    "torch",
    "transformers",
    "accelerate",
    "diffusers",
    "pillow",
    "numpy",
    "pandas",
];

const NOTEBOOK_STACK: &[&str] = &["jupyterlab", "ipywidgets", "matplotlib", "pandas", "numpy"];

const MARIMO_BASE: &[&str] = &["marimo", "fastapi[standard]", "uvicorn"];

/// Predefined dependency/GPU profile for the generated container image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentMode {
    /// Gradio + FastAPI only, CPU container.
    #[default]
    Minimum,
    /// Gradio plus the common ML stack on a GPU.
    Optimized,
    /// Serve a marimo notebook instead of a Gradio app.
    Marimo,
    /// Gradio plus a Jupyter toolset.
    GradioJupyter,
}

impl DeploymentMode {
    pub const ALL: [Self; 4] = [
        Self::Minimum,
        Self::Optimized,
        Self::Marimo,
        Self::GradioJupyter,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::Optimized => "optimized",
            Self::Marimo => "marimo",
            Self::GradioJupyter => "gradio-jupyter",
        }
    }

    /// One-line summary shown by the wizard and `config-info`.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Minimum => "CPU only, Gradio + FastAPI (fast cold starts)",
            Self::Optimized => "GPU with torch, transformers and diffusers",
            Self::Marimo => "marimo notebook served over ASGI",
            Self::GradioJupyter => "Gradio plus JupyterLab, ipywidgets and matplotlib",
        }
    }

    /// Base pip packages for this mode, in install order.
    #[must_use]
    pub fn pip_packages(self) -> Vec<&'static str> {
        let parts: &[&[&str]] = match self {
            Self::Minimum => &[GRADIO_BASE],
            Self::Optimized => &[GRADIO_BASE, ML_STACK],
            Self::Marimo => &[MARIMO_BASE],
            Self::GradioJupyter => &[GRADIO_BASE, NOTEBOOK_STACK],
        };
        parts.iter().flat_map(|p| p.iter().copied()).collect()
    }

    /// GPU attached when the user does not ask for one explicitly.
    #[must_use]
    pub fn default_gpu(self) -> Option<GpuSpec> {
        match self {
            Self::Optimized => Some(GpuSpec::single(GpuKind::Any)),
            _ => None,
        }
    }

    /// Whether the embedded source is a Gradio app (as opposed to a notebook).
    #[must_use]
    pub fn serves_gradio(self) -> bool {
        !matches!(self, Self::Marimo)
    }
}

impl FromStr for DeploymentMode {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimum" | "min" => Ok(Self::Minimum),
            "optimized" | "optimised" => Ok(Self::Optimized),
            "marimo" => Ok(Self::Marimo),
            "gradio-jupyter" | "gra-jupy" => Ok(Self::GradioJupyter),
            _ => Err(TemplateError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
