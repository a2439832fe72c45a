//! A small end-to-end tour of the view layer: a roster view composes one
//! child view per person, a delegated click handler marks people as greeted,
//! and the document is printed before and after a synthetic click.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use trellis_core::prelude::*;

#[derive(Clone, Serialize)]
struct Person {
    name: String,
    greeted: bool,
}

fn person_view(doc: &Document, person: Rc<RefCell<Person>>) -> Result<View, ViewError> {
    View::new(
        doc,
        ViewConfig::new()
            .tag("li")
            .class("person")
            .template(|| {
                compile("<span class=\"name\">{{name}}</span> <button class=\"greet\">{{label}}</button>")
                    .unwrap()
            })
            .template_data({
                let person = person.clone();
                move || {
                    let p = person.borrow();
                    let mut data = serde_json::to_value(&*p).unwrap_or(serde_json::Value::Null);
                    if let serde_json::Value::Object(map) = &mut data {
                        let label = if p.greeted { "again" } else { "greet" };
                        map.insert("label".to_string(), json!(label));
                    }
                    data
                }
            })
            .element_ref("$name", ".name")
            .on_delegated("click", ".greet", {
                let person = person.clone();
                move |view, _event| {
                    {
                        let mut p = person.borrow_mut();
                        p.greeted = true;
                        log::info!("greeted {}", p.name);
                    }
                    // Re-render in place; delegation on the root survives.
                    if let Err(err) = view.render() {
                        log::error!("re-render failed: {err}");
                    }
                }
            }),
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let doc = Document::new();
    let people: Vec<Rc<RefCell<Person>>> = ["Matt", "Ida"]
        .iter()
        .map(|&name| {
            Rc::new(RefCell::new(Person {
                name: name.to_string(),
                greeted: false,
            }))
        })
        .collect();

    let roster = View::new(
        &doc,
        ViewConfig::new()
            .class("roster")
            .template(|| compile("<h1>Roster</h1><ul class=\"people\"></ul>").unwrap()),
    )?;
    roster.append_to(&doc.body())?;

    let mut children = Vec::new();
    for person in &people {
        let child = person_view(&doc, person.clone())?;
        child.append_to(".people")?;
        children.push(child);
    }

    println!("before: {}", doc.body().outer_html());

    // Simulate a click on Matt's greet button.
    if let Some(button) = doc.query(".person .greet").unwrap().first() {
        button.dispatch("click");
    }

    println!("after:  {}", doc.body().outer_html());

    // The caller owns child lifecycles; tear everything down explicitly.
    for child in children {
        child.dispose()?;
    }
    roster.dispose()?;
    Ok(())
}
