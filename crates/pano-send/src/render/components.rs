//! Shared HTML components: page shell, inline CSS and script, and the
//! Content-Security-Policy for rendered pages.

use maud::{Markup, PreEscaped, html};

/// Inline CSS for the send page.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#f0932b;--accent-hover:#d97c14;--surface:#fff;--danger:#c0392b;--border:rgba(0,0,0,.12)}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:680px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}

.page-title{font-size:1.5rem;font-weight:700;margin-bottom:1rem;letter-spacing:-.01em}
.send-form{display:flex;flex-direction:column;gap:1rem;padding:1.5rem;border:1px solid var(--border);border-radius:10px;background:var(--surface)}
.field{display:flex;flex-direction:column;gap:.35rem}
.field label{font-weight:600;font-size:.9rem;color:var(--fg2)}
.field input,.field textarea{font:inherit;padding:.55rem .75rem;border:1px solid var(--border);border-radius:6px;background:var(--bg);color:var(--fg)}
.field input:focus,.field textarea:focus{outline:2px solid var(--accent);outline-offset:-1px}
.field textarea{min-height:10rem;resize:vertical}
.validation-message{color:var(--danger);font-size:.9rem}
.validation-message[data-submitting="true"]{opacity:.5}
.send-submit{align-self:flex-start;padding:.55rem 1.4rem;background:var(--accent);color:#fff;border:none;border-radius:6px;font:inherit;font-weight:600;cursor:pointer;transition:background .15s}
.send-submit:hover{background:var(--accent-hover)}
.send-submit:disabled{opacity:.6;cursor:progress}

.footer{text-align:center;margin-top:1rem;padding-top:.75rem;font-size:.8rem;color:var(--fg3);width:100%;max-width:680px}

@media(prefers-color-scheme:dark){
:root{--bg:#0a0a0f;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--surface:#111118;--danger:#ff6b5b;--border:rgba(255,255,255,.12)}
}
"#;

/// Inline script for the send form.
///
/// Mirrors `pano_core::prefill`: paste fetches metadata right away, typing
/// fetches after the quiet period given by `data-debounce-ms` and cancels any
/// earlier scheduled fetch, and responses older than the newest request are
/// ignored. Metadata only replaces title and content the user has not typed
/// into; an endpoint error clears those untouched fields. Submissions go
/// through `fetch` so errors render inline.
pub const SEND_JS: &str = r#"
(function(){
var form=document.getElementById('send-form');
if(!form)return;
var urlInput=document.getElementById('url');
var titleInput=document.getElementById('title');
var contentInput=document.getElementById('content');
var errorBox=document.getElementById('send-error');
var button=document.getElementById('send-submit');
var endpoint=form.dataset.metaEndpoint;
var delay=parseInt(form.dataset.debounceMs,10)||1500;
var issued=0;
var pending=null;
function showError(message){
errorBox.textContent=message||'';
errorBox.hidden=!message;
}
function markEdited(){this.dataset.edited='true';}
titleInput.addEventListener('input',markEdited);
contentInput.addEventListener('input',markEdited);
function prefill(input,value){
if(input.dataset.edited!=='true')input.value=value||'';
}
function fetchMeta(url){
var seq=++issued;
var body=new URLSearchParams();
body.set('url',url);
fetch(endpoint,{method:'POST',body:body,headers:{'Accept':'application/json'}})
.then(function(res){return res.json();})
.then(function(data){
if(seq!==issued)return;
if(data&&data.meta){
prefill(titleInput,data.meta.title);
prefill(contentInput,data.meta.description);
showError(null);
}else if(data&&data.error){
prefill(titleInput,'');
prefill(contentInput,'');
showError(data.error.message);
}
})
.catch(function(){
if(seq===issued)showError(form.dataset.metaFailed);
});
}
urlInput.addEventListener('paste',function(event){
var current=urlInput.value.trim();
var url=current||(event.clipboardData?event.clipboardData.getData('text'):'');
fetchMeta(url);
});
urlInput.addEventListener('input',function(){
var captured=urlInput.value;
clearTimeout(pending);
pending=setTimeout(function(){
pending=null;
if(captured===urlInput.value)fetchMeta(captured);
},delay);
});
form.addEventListener('submit',function(event){
event.preventDefault();
button.disabled=true;
button.textContent=form.dataset.busyLabel;
errorBox.dataset.submitting='true';
fetch(form.action,{method:'POST',body:new URLSearchParams(new FormData(form)),headers:{'Accept':'application/json'},credentials:'same-origin'})
.then(function(res){
if(res.redirected){window.location.assign(res.url);return null;}
return res.json();
})
.then(function(data){
if(data&&data.error)showError(data.error.message);
})
.catch(function(){showError(form.dataset.submitFailed);})
.finally(function(){
button.disabled=false;
button.textContent=form.dataset.idleLabel;
errorBox.dataset.submitting='false';
});
});
})();
"#;

/// Content-Security-Policy header value.
///
/// Inline styles and the inline form script only. `connect-src` also allows
/// the metadata endpoint's origin when it is hosted elsewhere.
pub fn content_security_policy(meta_endpoint: &str) -> String {
    let extra_origin = url::Url::parse(meta_endpoint)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|u| format!(" {}", u.origin().ascii_serialization()))
        .unwrap_or_default();

    format!(
        "default-src 'none'; style-src 'unsafe-inline'; script-src 'unsafe-inline'; \
         img-src https: data:; connect-src 'self'{extra_origin}; form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Render the full HTML page shell with `<head>` and body content.
pub fn page_shell(title: &str, description: &str, body_content: Markup, site_name: &str) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="tr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · " (site_name) }
                meta name="description" content=(description);
                meta name="robots" content="noindex";
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
                footer class="footer" { (site_name) }
            }
        }
    }
}
