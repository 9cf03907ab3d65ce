//! UI strings and display labels for tags and features.

use crate::locale::Language;

const PT: &[(&str, &str)] = &[
    ("nav.products", "Produtos"),
    ("btn.theme", "Tema"),
    ("products.title", "Produtos e Planos"),
    ("products.subtitle", "Exemplos de itens que você pode oferecer."),
    ("footer.policy", "Política de uso"),
    ("site.label", "Página Oficial"),
    ("nav.back", "Voltar"),
    ("checkout.title", "Checkout"),
    ("checkout.pay", "Prosseguir para pagamento"),
    ("label.country", "País"),
    ("label.product", "Produto"),
    ("product.notFound", "Produto não encontrado"),
    ("product.loadError", "Erro ao carregar produto"),
    ("image.unavailable", "Imagem indisponível"),
    ("cta.buy", "Comprar"),
    ("toast.offer.desc", "Oferta: confira este plano com ótimo custo."),
    ("toast.offer.cta", "Ver oferta"),
    ("toast.close", "Fechar"),
    ("product.imageAlt", "Imagem do produto {title}"),
    ("notify.enable", "Ativar notificações"),
    ("notify.disable", "Desativar notificações"),
    ("filters.label", "Filtrar por plataforma"),
];

const EN: &[(&str, &str)] = &[
    ("nav.products", "Products"),
    ("btn.theme", "Theme"),
    ("products.title", "Products and Plans"),
    ("products.subtitle", "Examples of items you can offer."),
    ("footer.policy", "Usage policy"),
    ("site.label", "Official Page"),
    ("nav.back", "Back"),
    ("checkout.title", "Checkout"),
    ("checkout.pay", "Proceed to payment"),
    ("label.country", "Country"),
    ("label.product", "Product"),
    ("product.notFound", "Product not found"),
    ("product.loadError", "Error loading product"),
    ("image.unavailable", "Image unavailable"),
    ("cta.buy", "Buy"),
    ("toast.offer.desc", "Deal: check out this plan with great value."),
    ("toast.offer.cta", "View deal"),
    ("toast.close", "Close"),
    ("product.imageAlt", "Product image {title}"),
    ("notify.enable", "Enable notifications"),
    ("notify.disable", "Disable notifications"),
    ("filters.label", "Filter by platform"),
];

/// Base-language tag to its English label.
const TAG_LABELS: &[(&str, &str)] = &[
    ("Emulador", "Emulator"),
    ("Mobile", "Mobile"),
    ("PC", "PC"),
    ("Android", "Android"),
    ("iOS", "iOS"),
];

const FEATURE_LABELS: &[(&str, &str)] = &[
    ("Aimbot", "Aimbot"),
    ("Gelo invertido", "Inverted ice"),
    ("Mira pro", "Pro aim"),
    ("Integrações com APIs", "API integrations"),
    ("Logs e auditoria", "Logs and auditing"),
    ("Suporte prioritário", "Priority support"),
    ("Onboarding", "Onboarding"),
    ("Boas práticas de segurança", "Security best practices"),
    ("Documentação", "Documentation"),
];

const TAG_CLASSES: &[(&str, &str)] = &[
    ("PC", "tag--pc"),
    ("Mobile", "tag--mobile"),
    ("iOS", "tag--ios"),
    ("Android", "tag--android"),
    ("Emulador", "tag--emulador"),
];

/// Tags offered as filter buttons on the storefront page.
pub const FILTER_TAGS: [&str; 5] = ["PC", "Mobile", "iOS", "Android", "Emulador"];

fn lookup<'a>(table: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Looks up a UI string, returning the key itself when it is unknown.
#[must_use]
pub fn t(language: Language, key: &str) -> String {
    let table = match language {
        Language::Portuguese => PT,
        Language::English => EN,
    };
    lookup(table, key).unwrap_or(key).to_string()
}

/// Like [`t`], replacing every `{name}` placeholder with its value.
#[must_use]
pub fn t_format(language: Language, key: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(t(language, key), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}

/// Display label for a tag; unknown tags pass through.
#[must_use]
pub fn translate_tag(language: Language, tag: &str) -> String {
    translate(TAG_LABELS, language, tag)
}

/// Display label for a feature; unknown features pass through.
#[must_use]
pub fn translate_feature(language: Language, feature: &str) -> String {
    translate(FEATURE_LABELS, language, feature)
}

fn translate(table: &[(&str, &str)], language: Language, label: &str) -> String {
    match language {
        Language::Portuguese => label.to_string(),
        Language::English => lookup(table, label).unwrap_or(label).to_string(),
    }
}

/// CSS modifier class for known platform tags.
#[must_use]
pub fn tag_class(tag: &str) -> Option<&'static str> {
    TAG_CLASSES.iter().find(|(k, _)| *k == tag).map(|(_, v)| *v)
}
