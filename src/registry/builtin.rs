//! The built-in host table.

use std::sync::Arc;

use log::debug;

use super::Registry;
use crate::error_handling::RegistryError;
use crate::strategy::{
    dlsharing, dlsite, dmm_page, Base64QueryParam, DmmLogin, FollowRedirect, MetaRefresh,
    PathLookup, QueryParam, ReplaceHost, ScriptUrl, Strategy,
};

const REDIRECT_HOSTS: &[&str] = &[
    "t.co",
    "x.gd",
    "tinyurl.com",
    "bit.ly",
    "adserver.assistads.net",
    "tr.adplushome.com",
    "ap.octopuspop.com",
    "cloud.xaid.jp",
];

const LURL_HOSTS: &[&str] = &[
    "al.fanza.co.jp",
    "al.dmm.co.jp",
    "al.dmm.com",
    "rcv.idx.dmm.com",
    "rcv.ixd.dmm.com",
    "rcv.ixd.dmm.co.jp",
];

const META_REFRESH_HOSTS: &[&str] = &[
    "b-short.link",
    "momentary.link",
    "min-link.com",
    "to-link.click",
];

const SHORT_LINK_API_HOSTS: &[&str] = &[
    "ad-dmm.net",
    "ad-dmm.com",
    "dmm-ad.com",
    "live-gx.cc",
    "live-kq.cc",
    "short-net.org",
];

/// Storefront hosts whose pages keep no query parameters.
const DMM_STRIP_ALL_HOSTS: &[&str] = &["www.dmm.co.jp", "book.dmm.co.jp"];

/// Builds the registry of every supported redirector and storefront host.
///
/// # Errors
///
/// Fails only if the table itself lists a host twice.
pub fn builtin() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();

    registry.register_all(REDIRECT_HOSTS, Arc::new(FollowRedirect))?;
    registry.register_all(LURL_HOSTS, Arc::new(QueryParam::new("lurl")))?;
    registry.register("numa2.com", Base64QueryParam::new("u"))?;
    registry.register_all(META_REFRESH_HOSTS, Arc::new(MetaRefresh))?;
    registry.register("live-dh.cc", ScriptUrl)?;
    registry.register_all(SHORT_LINK_API_HOSTS, Arc::new(PathLookup::short_link()))?;

    registry.register("dlaf.jp", ReplaceHost::new("www.dlsite.com"))?;
    registry.register("dlsharing.com", dlsharing())?;
    registry.register("www.dlsite.com", dlsite())?;

    registry.register("dmm.co.jp", ReplaceHost::new("www.dmm.co.jp"))?;
    let strip_all: Arc<dyn Strategy> = Arc::new(dmm_page(&[]));
    registry.register_all(DMM_STRIP_ALL_HOSTS, strip_all)?;
    registry.register("video.dmm.co.jp", dmm_page(&["id"]))?;
    registry.register("accounts.dmm.co.jp", DmmLogin)?;

    debug!("Built-in registry loaded with {} hosts", registry.len());
    Ok(registry)
}
