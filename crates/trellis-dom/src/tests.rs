#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::Document;

    #[test]
    fn test_tree_insertion_order() {
        let doc = Document::new();
        let body = doc.body();
        let a = doc.create_element("div");
        a.set_attr("id", "a");
        let b = doc.create_element("div");
        b.set_attr("id", "b");
        let c = doc.create_element("div");
        c.set_attr("id", "c");

        body.append(&a);
        body.append(&b);
        body.prepend(&c);
        assert_eq!(
            body.children()
                .iter()
                .map(|el| el.attr("id").unwrap())
                .collect::<Vec<_>>(),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn test_reinsertion_moves_node() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<div id=\"x\"></div><div id=\"y\"></div>")
            .unwrap();
        let x = doc.query("#x").unwrap().first().unwrap();
        let y = doc.query("#y").unwrap().first().unwrap();
        y.append(&x);
        assert_eq!(body.children().len(), 1);
        assert_eq!(x.parent().unwrap(), y);
    }

    #[test]
    fn test_replace_with() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<p id=\"old\">old</p><p>tail</p>").unwrap();
        let old = doc.query("#old").unwrap().first().unwrap();
        let fresh = doc.create_element("section");
        old.replace_with(&fresh);

        assert!(!old.is_connected());
        assert!(fresh.is_connected());
        // Replacement takes the old node's position.
        assert_eq!(body.children()[0], fresh);
        // The detached node keeps its subtree.
        assert_eq!(old.text(), "old");
    }

    #[test]
    fn test_detach_keeps_bindings_remove_purges() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<button id=\"go\">go</button>").unwrap();
        let button = doc.query("#go").unwrap().first().unwrap();
        let count = Rc::new(RefCell::new(0));
        {
            let count = count.clone();
            button.on(
                "click",
                Rc::new(move |_| {
                    *count.borrow_mut() += 1;
                }),
            );
        }

        assert_eq!(button.dispatch("click"), 1);

        button.detach();
        // Detached but intact: direct dispatch still reaches the listener.
        assert_eq!(button.dispatch("click"), 1);

        body.append(&button);
        button.remove();
        assert_eq!(button.dispatch("click"), 0);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_set_inner_html_severs_descendant_bindings() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<div id=\"box\"><button id=\"go\">go</button></div>")
            .unwrap();
        let button = doc.query("#go").unwrap().first().unwrap();
        let fired = Rc::new(RefCell::new(0));
        {
            let fired = fired.clone();
            button.on(
                "click",
                Rc::new(move |_| {
                    *fired.borrow_mut() += 1;
                }),
            );
        }
        assert_eq!(button.dispatch("click"), 1);

        body.set_inner_html("<div id=\"box\"></div>").unwrap();
        // The old button survives as a detached node, but its binding is gone.
        assert!(!button.is_connected());
        assert_eq!(button.text(), "go");
        assert_eq!(button.dispatch("click"), 0);
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_dispatch_bubbles_inner_first() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<div id=\"outer\"><div id=\"inner\"></div></div>")
            .unwrap();
        let outer = doc.query("#outer").unwrap().first().unwrap();
        let inner = doc.query("#inner").unwrap().first().unwrap();

        let order = Rc::new(RefCell::new(Vec::new()));
        for (el, name) in [(&inner, "inner"), (&outer, "outer"), (&body, "body")] {
            let order = order.clone();
            el.on(
                "ping",
                Rc::new(move |_| {
                    order.borrow_mut().push(name);
                }),
            );
        }
        assert_eq!(inner.dispatch("ping"), 3);
        assert_eq!(*order.borrow(), vec!["inner", "outer", "body"]);
    }

    #[test]
    fn test_delegated_listener() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<ul><li class=\"item\">a</li><li class=\"other\">b</li></ul>")
            .unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            body.on_delegated(
                "click",
                ".item",
                Rc::new(move |event| {
                    seen.borrow_mut().push(event.current.text());
                }),
            )
            .unwrap();
        }

        let items = doc.query("li").unwrap();
        assert_eq!(items.get(0).unwrap().dispatch("click"), 1);
        assert_eq!(items.get(1).unwrap().dispatch("click"), 0);
        assert_eq!(*seen.borrow(), vec!["a"]);
    }

    #[test]
    fn test_off_is_idempotent() {
        let doc = Document::new();
        let body = doc.body();
        let id = body.on("click", Rc::new(|_| {}));
        doc.off(id);
        doc.off(id);
        assert_eq!(body.dispatch("click"), 0);
    }

    #[test]
    fn test_event_target_and_current() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<div class=\"row\"><span id=\"s\">x</span></div>")
            .unwrap();
        let span = doc.query("#s").unwrap().first().unwrap();
        let row = doc.query(".row").unwrap().first().unwrap();

        let hits = Rc::new(RefCell::new(Vec::new()));
        {
            let hits = hits.clone();
            let span = span.clone();
            let row = row.clone();
            body.on_delegated(
                "click",
                ".row",
                Rc::new(move |event| {
                    hits.borrow_mut()
                        .push((event.target == span, event.current == row));
                }),
            )
            .unwrap();
        }
        span.dispatch("click");
        assert_eq!(*hits.borrow(), vec![(true, true)]);
    }

    #[test]
    fn test_handler_may_mutate_document() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<div id=\"box\">old</div>").unwrap();
        {
            let body = body.clone();
            doc.body().on(
                "refresh",
                Rc::new(move |_| {
                    body.set_inner_html("<div id=\"box\">new</div>").unwrap();
                }),
            );
        }
        let box_el = doc.query("#box").unwrap().first().unwrap();
        assert_eq!(box_el.dispatch("refresh"), 1);
        assert_eq!(doc.query("#box").unwrap().text(), "new");
    }

    #[test]
    fn test_stale_handle_is_inert() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<p>x</p>").unwrap();
        let p = doc.query("p").unwrap().first().unwrap();
        p.remove();

        assert_eq!(p.text(), "");
        assert!(p.query("span").unwrap().is_empty());
        assert!(!p.is_connected());
        body.append(&p);
        assert_eq!(body.children().len(), 0);
    }

    #[test]
    fn test_cycle_refused() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<div id=\"outer\"><div id=\"inner\"></div></div>")
            .unwrap();
        let outer = doc.query("#outer").unwrap().first().unwrap();
        let inner = doc.query("#inner").unwrap().first().unwrap();
        inner.append(&outer);
        assert_eq!(outer.parent().unwrap(), body);
    }
}
