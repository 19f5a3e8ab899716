//! Built-in storefront configuration, used when the CMS is unreachable.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::api::{
    StorefrontBanners, StorefrontBranding, StorefrontColors, StorefrontConfig, StorefrontContact,
    StorefrontSeo,
};

/// The storefront configuration shipped with the client.
#[must_use]
pub fn storefront_defaults() -> StorefrontConfig {
    StorefrontConfig {
        version: "1.0".to_string(),
        last_updated: Utc::now(),
        branding: StorefrontBranding {
            store_name: "San Pablo".to_string(),
            tagline: "Arte y Libros".to_string(),
            header_logo_url: String::new(),
            footer_logo_url: String::new(),
            favicon_url: String::new(),
        },
        colors: StorefrontColors {
            primary: "#4a90d9".to_string(),
            secondary: "#2c5282".to_string(),
            accent: "#ed8936".to_string(),
            background: "#ffffff".to_string(),
            text: "#1a202c".to_string(),
            text_muted: "#718096".to_string(),
        },
        banners: StorefrontBanners::default(),
        faq: Vec::new(),
        contact: StorefrontContact {
            whatsapp_number: "+5491123456789".to_string(),
            email: "contacto@sanpablo.com".to_string(),
            phone: "+54 11 4321-1234".to_string(),
            address: "Av. Corrientes 1234, CABA, Argentina".to_string(),
            social_links: BTreeMap::from([("whatsapp".to_string(), String::new())]),
        },
        seo: StorefrontSeo {
            meta_title: "San Pablo - Arte y Libros".to_string(),
            meta_description: "Tu tienda de arte y libreria favorita".to_string(),
            og_image: String::new(),
        },
    }
}

/// `section` if present, else the matching section of the defaults.
///
/// ```rust,ignore
/// let seo = with_defaults(config.map(|c| c.seo), |d| d.seo);
/// ```
pub fn with_defaults<T>(section: Option<T>, pick: impl FnOnce(StorefrontConfig) -> T) -> T {
    section.unwrap_or_else(|| pick(storefront_defaults()))
}
