//! User-facing messages of the deploy flow, in English or Brazilian Portuguese.
//!
//! `--br-huehuehue` switches the deploy flow to Portuguese.

/// Message language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    BrazilianPortuguese,
}

/// Messages emitted while deploying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    CheckingAuth,
    Authenticated,
    Generating,
    Generated,
    DryRunDone,
    Deploying,
    Deployed,
    NoUrl,
    StoppingTestDeploy,
    TestDeployStopped,
    NoExpiration,
    Expiration,
}

impl Message {
    #[must_use]
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => self.english(),
            Locale::BrazilianPortuguese => self.portuguese(),
        }
    }

    fn english(self) -> &'static str {
        match self {
            Self::CheckingAuth => "Checking Modal authentication...",
            Self::Authenticated => "Authenticated via",
            Self::Generating => "Generating deployment file...",
            Self::Generated => "Deployment file written to",
            Self::DryRunDone => "Dry run: skipping deploy. Deploy later with",
            Self::Deploying => "Deploying to Modal...",
            Self::Deployed => "Deployed! Your app is live at:",
            Self::NoUrl => "Deployed, but no web URL was found in the modal output.",
            Self::StoppingTestDeploy => "Test deploy: stopping app",
            Self::TestDeployStopped => "Test deploy stopped.",
            Self::NoExpiration => "No expiration: the app keeps serving for up to 24 hours per container.",
            Self::Expiration => "Containers expire after (minutes):",
        }
    }

    fn portuguese(self) -> &'static str {
        match self {
            Self::CheckingAuth => "Verificando autenticação do Modal...",
            Self::Authenticated => "Autenticado via",
            Self::Generating => "Gerando arquivo de deploy...",
            Self::Generated => "Arquivo de deploy salvo em",
            Self::DryRunDone => "Modo teste: deploy pulado. Faça o deploy depois com",
            Self::Deploying => "Fazendo deploy no Modal... huehuehue",
            Self::Deployed => "Deploy feito! Seu app está no ar em:",
            Self::NoUrl => "Deploy feito, mas nenhuma URL apareceu na saída do modal.",
            Self::StoppingTestDeploy => "Deploy de teste: parando o app",
            Self::TestDeployStopped => "Deploy de teste parado.",
            Self::NoExpiration => "Sem expiração: o app fica no ar por até 24 horas por container.",
            Self::Expiration => "Os containers expiram depois de (minutos):",
        }
    }
}
