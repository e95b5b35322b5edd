//! Chrome-suppression script injected once per page load.
//!
//! The script makes the embedded site feel like a native app: fixed
//! viewport, no selection or long-press callouts, no browser-style bars.
//! Anchor clicks are rewritten to plain same-surface navigations, so every
//! link (including `target=_blank` ones) reaches the policy engine as an
//! ordinary request. The script does not classify anything itself.

/// Viewport content when pinch-zoom is disabled.
const VIEWPORT_FIXED: &str = "width=device-width,initial-scale=1,maximum-scale=1,user-scalable=no";
/// Viewport content when zoom stays available.
const VIEWPORT_SCALABLE: &str = "width=device-width,initial-scale=1";

/// Window flag that makes re-injection a no-op.
const GUARD_FLAG: &str = "__ordershellChromeSuppressed";

const SUPPRESS_CSS: &str = "\
html, body { margin: 0 !important; padding: 0 !important; overflow-x: hidden !important; \
-webkit-user-select: none !important; user-select: none !important; \
-webkit-touch-callout: none !important; -webkit-tap-highlight-color: transparent !important; } \
input, textarea, [contenteditable] { -webkit-user-select: text !important; user-select: text !important; } \
.browser-nav, .url-bar, .address-bar { display: none !important; } \
* { -webkit-overflow-scrolling: touch !important; outline: none !important; }";

/// Builds the injected script. Pure function of `disable_zoom`.
pub fn injected_script(disable_zoom: bool) -> String {
    let viewport = if disable_zoom {
        VIEWPORT_FIXED
    } else {
        VIEWPORT_SCALABLE
    };

    format!(
        r#"(function(){{
  if (window.{guard}) {{ return true; }}
  window.{guard} = true;

  var head = document.head || document.getElementsByTagName('head')[0] || document.documentElement;

  var meta = document.querySelector('meta[name=viewport]');
  if (!meta) {{
    meta = document.createElement('meta');
    meta.name = 'viewport';
    head.appendChild(meta);
  }}
  meta.setAttribute('content', '{viewport}');

  var style = document.createElement('style');
  style.textContent = '{css}';
  head.appendChild(style);

  document.addEventListener('contextmenu', function(e) {{ e.preventDefault(); }});
  document.addEventListener('selectstart', function(e) {{
    var t = e.target;
    if (t && (t.tagName === 'INPUT' || t.tagName === 'TEXTAREA' || t.isContentEditable)) {{ return; }}
    e.preventDefault();
  }});

  document.addEventListener('click', function(e) {{
    var a = e.target;
    while (a && a.tagName !== 'A') {{ a = a.parentElement; }}
    if (!a || !a.href) {{ return; }}
    var href = a.href;
    if (href.indexOf('javascript:') === 0 || href.charAt(href.length - 1) === '#') {{ return; }}
    e.preventDefault();
    window.location.href = href;
  }}, true);

  window.open = function(url) {{
    if (url) {{ window.location.href = url; }}
    return null;
  }};

  return true;
}})();"#,
        guard = GUARD_FLAG,
        viewport = viewport,
        css = SUPPRESS_CSS,
    )
}
