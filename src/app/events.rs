//! Browser entry point: installs every page listener once the DOM is ready
//! and exports the handlers the templates call from inline `onclick`s.

use std::rc::Rc;

use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement, MouseEvent, Window};

use crate::client::WasmClient;
use crate::config::{ShopConfig, LOGIN_PROMPT_DELAY, MESSAGE_FADE_DURATION};
use crate::effects::{
    self, AuthTab, CounterAnimation, PasswordVisibility, FIXED_HEADER_CLASS, LOGIN_PROMPT_TEXT,
    PARALLAX_RESET,
};
use crate::filter::{self, Category};
use crate::interface::HttpClient;
use crate::model::structs::{CartItemId, CourseId};

use super::controller::ShopController;
use super::dom::{next_animation_frame, query_all, set_style, style_value, DomPage};
use super::timer;

type Controller = ShopController<WasmClient, DomPage>;

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());

    let Some(page) = DomPage::current() else {
        return;
    };
    if page.document().ready_state() == "loading" {
        let on_ready = Closure::<dyn FnMut()>::new(|| spawn_local(init()));
        let _ = page
            .document()
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref());
        on_ready.forget();
    } else {
        spawn_local(init());
    }
}

async fn init() {
    let Some(page) = DomPage::current() else {
        return;
    };
    let window = page.window().clone();
    let document = page.document().clone();

    fade_flash_messages(&document);
    apply_auth_tab(&document, AuthTab::Login);
    restore_category_filter(&window, &document);
    install_password_toggles(&document);
    install_profile_edit(&document);
    install_scroll_effects(&window, &document);
    install_cursor_follow(&window, &document);

    let client = match WasmClient::new(ShopConfig::same_origin()).await {
        Ok(client) => client,
        Err(e) => {
            log::error!("storefront client unavailable: {e}");
            return;
        }
    };
    let controller = Rc::new(ShopController::new(client, page));
    install_shop_clicks(&document, controller);
}

fn on<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("could not listen for {event}: {e:?}");
    }
    closure.forget();
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Closest ancestor (or self) matching `selector`, with its parsed `data-id`.
fn data_id<T: std::str::FromStr>(start: &Element, selector: &str) -> Option<(Element, T)> {
    let el = start.closest(selector).ok().flatten()?;
    let id = el.get_attribute("data-id")?.parse::<T>().ok()?;
    Some((el, id))
}

fn install_shop_clicks(document: &Document, controller: Rc<Controller>) {
    on(document, "click", move |event: Event| {
        let Some(target) = event_element(&event) else {
            return;
        };

        if let Some((_, course)) = data_id::<CourseId>(&target, ".add-fav") {
            event.prevent_default();
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                let _ = controller.toggle_favorite(course).await;
            });
        } else if let Some((_, course)) = data_id::<CourseId>(&target, ".remove-favorite") {
            event.prevent_default();
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                let _ = controller.remove_favorite(course).await;
            });
        } else if let Some((_, course)) = data_id::<CourseId>(&target, ".add-to-cart") {
            event.prevent_default();
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                let _ = controller.add_to_cart(course).await;
            });
        } else if let Some((_, item)) = data_id::<CartItemId>(&target, ".remove-cart") {
            event.prevent_default();
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                if let Ok(Some(ticket)) = controller.remove_from_cart(item).await {
                    controller.run_undo_expiry(ticket).await;
                }
            });
        } else if target.closest("#undo-btn").ok().flatten().is_some() {
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                let _ = controller.undo_last_removal().await;
            });
        }
    });
}

fn fade_flash_messages(document: &Document) {
    let document = document.clone();
    spawn_local(async move {
        let schedule = effects::message_fade();
        timer::sleep(schedule.fade_at).await;
        let messages = query_all(&document, ".custom-message");
        for msg in &messages {
            set_style(msg, "opacity", "0");
        }
        timer::sleep(schedule.hide_at - schedule.fade_at).await;
        for msg in &messages {
            set_style(msg, "display", "none");
        }
    });
}

fn apply_auth_tab(document: &Document, tab: AuthTab) {
    let layout = tab.layout();
    let display = |visible: bool| if visible { "block" } else { "none" };

    if let Ok(Some(login)) = document.query_selector(".loginDiv") {
        set_style(&login, "display", display(layout.login_visible));
    }
    if let Ok(Some(register)) = document.query_selector(".registerDiv") {
        set_style(&register, "display", display(layout.register_visible));
    }
    for (id, active) in [("loginBtn", layout.login_active), ("registerBtn", layout.register_active)] {
        if let Some(btn) = document.get_element_by_id(id) {
            let _ = btn.class_list().toggle_with_force("active-btn", active);
        }
    }
}

fn current_document() -> Option<Document> {
    web_sys::window()?.document()
}

#[wasm_bindgen(js_name = showLogin)]
pub fn show_login() {
    if let Some(document) = current_document() {
        apply_auth_tab(&document, AuthTab::Login);
    }
}

#[wasm_bindgen(js_name = showRegister)]
pub fn show_register() {
    if let Some(document) = current_document() {
        apply_auth_tab(&document, AuthTab::Register);
    }
}

#[wasm_bindgen(js_name = toggleSubcategory)]
pub fn toggle_subcategory(element: Element) {
    let Some(wrapper) = element.closest("li").ok().flatten() else {
        return;
    };
    if let Ok(Some(content)) = wrapper.query_selector(".subcategory-content") {
        let next = effects::toggle_display(&style_value(&content, "display"));
        set_style(&content, "display", next);
    }
    if let Ok(Some(icons)) = wrapper.query_selector(".toggle-icons") {
        let _ = icons.class_list().toggle("expanded");
    }
}

#[wasm_bindgen(js_name = redirectToCourses)]
pub fn redirect_to_courses(category: &str) {
    if let Some(window) = web_sys::window() {
        let url = filter::courses_url(&Category::parse(category));
        let _ = window.location().set_href(&url);
    }
}

#[wasm_bindgen(js_name = filterCourses)]
pub fn filter_courses(element: Element, skip_push: Option<bool>) {
    if let (Some(window), Some(document)) = (web_sys::window(), current_document()) {
        apply_category(&window, &document, &element, skip_push.unwrap_or(false));
    }
}

fn apply_category(window: &Window, document: &Document, element: &Element, skip_push: bool) {
    for el in query_all(document, ".filter-category-text p, .div-grid") {
        let _ = el.class_list().remove_1("active");
    }
    let _ = element.class_list().add_1("active");

    let selected = Category::parse(&element.get_attribute("data-category").unwrap_or_default());

    if !skip_push {
        let pathname = window.location().pathname().unwrap_or_default();
        let url = filter::filter_url(&pathname, &selected);
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&url));
        }
    }

    let cards = query_all(document, ".courses-maindiv");
    let categories: Vec<Option<String>> = cards.iter().map(|c| c.get_attribute("data-category")).collect();
    let shown = filter::visibility(&selected, categories.iter().map(Option::as_deref));
    for (card, visible) in cards.iter().zip(shown) {
        set_style(card, "display", if visible { "block" } else { "none" });
    }
}

fn restore_category_filter(window: &Window, document: &Document) {
    let elements = query_all(document, ".filter-category-text p[data-category]");
    let available: Vec<String> = elements
        .iter()
        .filter_map(|el| el.get_attribute("data-category"))
        .collect();
    let available: Vec<&str> = available.iter().map(String::as_str).collect();

    let search = window.location().search().unwrap_or_default();
    let Some(selected) = filter::initial_selection(&search, &available) else {
        return;
    };
    let element = elements
        .iter()
        .find(|el| el.get_attribute("data-category").as_deref() == Some(selected.as_str()));
    if let Some(element) = element {
        apply_category(window, document, element, true);
    }
}

fn install_password_toggles(document: &Document) {
    for icon in query_all(document, ".toggle-password") {
        let document = document.clone();
        let target = icon.clone();
        on(&icon, "click", move |_: Event| {
            let Some(input) = target
                .get_attribute("data-target")
                .and_then(|id| document.get_element_by_id(&id))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let next = PasswordVisibility::from_input_type(&input.type_()).toggled();
            input.set_type(next.input_type());
            let classes = target.class_list();
            let _ = classes.remove_1(next.stale_icon_class());
            let _ = classes.add_1(next.icon_class());
        });
    }
}

fn install_profile_edit(document: &Document) {
    let Some(edit) = document.get_element_by_id("editBtn") else {
        return;
    };
    let document = document.clone();
    on(&edit, "click", move |_: Event| {
        for input in query_all(&document, "#profileForm input") {
            if let Ok(input) = input.dyn_into::<HtmlInputElement>() {
                input.set_disabled(false);
            }
        }
        if let Some(edit) = document.get_element_by_id("editBtn") {
            set_style(&edit, "display", "none");
        }
        if let Some(update) = document.get_element_by_id("updateBtn") {
            set_style(&update, "display", "inline-block");
        }
    });
}

fn install_scroll_effects(window: &Window, document: &Document) {
    {
        let window = window.clone();
        let document = document.clone();
        on(&window.clone(), "scroll", move |_: Event| {
            if let Ok(Some(header)) = document.query_selector("header") {
                let fixed = effects::header_is_fixed(window.scroll_y().unwrap_or(0.0));
                let _ = header.class_list().toggle_with_force(FIXED_HEADER_CLASS, fixed);
            }
        });
    }

    let start_counters = {
        let window = window.clone();
        let document = document.clone();
        move |_: Event| start_visible_counters(&window, &document)
    };
    on(window, "scroll", start_counters.clone());
    on(window, "load", start_counters);
    start_visible_counters(window, document);
}

fn start_visible_counters(window: &Window, document: &Document) {
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);

    for counter in query_all(document, ".counter") {
        let top = counter.get_bounding_client_rect().top();
        if !effects::counter_should_start(top, viewport, counter.class_list().contains("done")) {
            continue;
        }
        let _ = counter.class_list().add_1("done");

        let animation = CounterAnimation::new(
            &counter.get_attribute("data-target").unwrap_or_default(),
            counter.get_attribute("data-suffix").as_deref().filter(|s| !s.is_empty()),
        );
        let window = window.clone();
        spawn_local(async move {
            for frame in animation {
                counter.set_text_content(Some(&frame));
                next_animation_frame(&window).await;
            }
        });
    }
}

fn install_cursor_follow(window: &Window, document: &Document) {
    {
        let window = window.clone();
        let doc = document.clone();
        on(document, "mousemove", move |event: MouseEvent| {
            let width = window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0);
            let height = window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0);
            let offset = effects::parallax_offset(
                f64::from(event.client_x()),
                f64::from(event.client_y()),
                width,
                height,
            );
            let transform = effects::translate(offset);
            for el in query_all(&doc, ".follow-cursor") {
                set_style(&el, "transform", &transform);
            }
        });
    }

    let doc = document.clone();
    on(document, "mouseleave", move |_: Event| {
        for el in query_all(&doc, ".follow-cursor") {
            set_style(&el, "transform", PARALLAX_RESET);
        }
    });
}

/// Shown when an anonymous visitor tries to use the wishlist.
#[wasm_bindgen(js_name = showLoginMessage)]
pub fn show_login_message() {
    let Some(document) = current_document() else {
        return;
    };
    spawn_local(async move {
        timer::sleep(LOGIN_PROMPT_DELAY).await;
        let (Some(body), Ok(banner)) = (document.body(), document.create_element("div")) else {
            return;
        };
        banner.set_class_name("login-prompt");
        banner.set_text_content(Some(LOGIN_PROMPT_TEXT));
        for (property, value) in [
            ("position", "fixed"),
            ("top", "20px"),
            ("right", "20px"),
            ("background-color", "#1ab69d"),
            ("color", "#fff"),
            ("padding", "10px 20px"),
            ("border-radius", "8px"),
            ("z-index", "9999"),
            ("box-shadow", "0px 0px 10px rgba(0,0,0,0.2)"),
            ("font-weight", "600"),
            ("transition", "opacity 0.3s"),
        ] {
            set_style(&banner, property, value);
        }
        if body.append_child(&banner).is_err() {
            return;
        }

        let schedule = effects::login_prompt_fade();
        timer::sleep(schedule.fade_at - LOGIN_PROMPT_DELAY).await;
        set_style(&banner, "opacity", "0");
        timer::sleep(MESSAGE_FADE_DURATION).await;
        banner.remove();
    });
}
