use indoc::indoc;

use super::Book;

#[test]
fn single_page() {
    let book = Book::init()
        .chapter(
            "ch01.html",
            indoc! {r##"
                <section id="intro">
                <h1>Introduction<a class="headerlink" href="#intro" title="Link to this heading">#</a></h1>
                <p>Some text.</p>
                <section id="details">
                <h2>Details</h2>
                <p>More.</p>
                </section>
                </section>
            "##},
        )
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing ch01...
    ├─ ch01.html
    │ <section id="intro" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Introduction</h1>
    │ <p>Some text.</p>
    │ <section id="details" data-type="sect1">
    │ <h1>Details</h1>
    │ <p>More.</p>
    │ </section>
    │ </section>
    "#);
}

#[test]
fn sections_from_several_pages() {
    let book = Book::init()
        .sections(&[
            (
                "notebooks/ch01.html",
                indoc! {r#"
                    <section id="chapter-one">
                    <h1>Chapter One</h1>
                    <p>Intro.</p>
                    </section>
                "#},
            ),
            (
                "notebooks/ch01-01.html",
                indoc! {r#"
                    <section id="first-section">
                    <h1><span class="section-number">1.1. </span>First Section</h1>
                    <p>One.</p>
                    <section id="deeper">
                    <h2>Deeper</h2>
                    </section>
                    </section>
                "#},
            ),
            (
                "notebooks/ch01-02.html",
                indoc! {r#"
                    <section id="second-section">
                    <h1>Second Section</h1>
                    <p>Two.</p>
                    </section>
                "#},
            ),
        ])
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing ch01...
    ├─ notebooks/ch01.html
    │ <section id="chapter-one" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Chapter One</h1>
    │ <p>Intro.</p>
    │ <section id="first-section" data-type="sect1">
    │ <h1>First Section</h1>
    │ <p>One.</p>
    │ <section id="deeper" data-type="sect2">
    │ <h2>Deeper</h2>
    │ </section>
    │ </section><section id="second-section" data-type="sect1">
    │ <h1>Second Section</h1>
    │ <p>Two.</p>
    │ </section></section>
    "#);
}

#[test]
fn bibliographies_are_merged() {
    let book = Book::init()
        .sections(&[
            (
                "ch02.html",
                indoc! {r#"
                    <section id="chapter-two">
                    <h1>Chapter Two</h1>
                    <p>Text.</p>
                    </section>
                    <section id="bibliography">
                    <h1>Bibliography</h1>
                    <dl class="citation"><dt class="label" id="baruch">Baruch</dt><dd><p>Baruch, 1993.</p></dd></dl>
                    </section>
                "#},
            ),
            (
                "ch02-01.html",
                indoc! {r#"
                    <section id="part-a">
                    <h1>Part A</h1>
                    </section>
                    <section id="bibliography">
                    <h1>Bibliography</h1>
                    <dl class="citation"><dt class="label" id="carver">Carver</dt><dd><p>Carver, 2001.</p></dd></dl>
                    </section>
                "#},
            ),
        ])
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing ch02...
    ├─ ch02.html
    │ <section id="chapter-two" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Chapter Two</h1>
    │ <p>Text.</p>
    │ <section id="part-a" data-type="sect1">
    │ <h1>Part A</h1>
    │ </section><section id="bibliography" data-type="sect1">
    │ <h1>Bibliography</h1>
    │ <ul class="author-date"><li><p>Baruch, 1993.</p></li><li><p>Carver, 2001.</p></li></ul>
    │ </section></section>
    "#);
}

#[test]
fn bibliography_page() {
    let book = Book::init()
        .chapter(
            "bibliography.html",
            indoc! {r#"
                <section id="bibliography">
                <h1>Bibliography</h1>
                <dl class="citation"><dt class="label" id="leek">Leek</dt><dd><p>Leek and Peng, 2015.</p></dd></dl>
                </section>
            "#},
        )
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing bibliography...
    ├─ bibliography.html
    │ <section id="bibliography" data-type="appendix" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Bibliography</h1>
    │ <ul class="author-date"><li><p>Leek and Peng, 2015.</p></li></ul>
    │ </section>
    "#);
}

#[test]
fn divisions_from_file_names() {
    let book = Book::init()
        .chapter("00-preface.html", r#"<section id="preface"><h1>Preface</h1></section>"#)
        .chapter("appx_a.html", r#"<section id="appendix-a"><h1>Appendix</h1></section>"#)
        .chapter("colophon.html", r#"<section id="colophon"><h1>Colophon</h1></section>"#)
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing 00-preface...
    │  INFO jb_htmlbook: Processing appx_a...
    │  INFO jb_htmlbook: Processing colophon...
    ├─ 00-preface.html
    │ <section id="preface" data-type="preface" xmlns="http://www.w3.org/1999/xhtml"><h1>Preface</h1></section>
    ├─ appx_a.html
    │ <section id="appendix-a" data-type="appendix" xmlns="http://www.w3.org/1999/xhtml"><h1>Appendix</h1></section>
    ├─ colophon.html
    │ <section id="colophon" data-type="colophon" xmlns="http://www.w3.org/1999/xhtml"><h1>Colophon</h1></section>
    "#);
}

#[test]
fn extra_sections() {
    let book = Book::init()
        .chapter(
            "ch03.html",
            indoc! {r#"
                <section id="one"><h1>One</h1></section>
                <section id="two"><h1>Two</h1></section>
            "#},
        )
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  WARN jb_htmlbook::chapter: The chapter with title 'One' has extra sections that will not be processed. Please check the notebook source files.
    │  INFO jb_htmlbook: Processing ch03...
    ├─ ch03.html
    │ <section id="one" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml"><h1>One</h1></section>
    "#);
}

#[test]
fn legacy_section_divs() {
    let book = Book::init()
        .chapter(
            "ch04.html",
            indoc! {r#"
                <div class="section" id="old-style">
                <h1>Old Style</h1>
                <div class="section" id="nested"><h2>Nested</h2></div>
                </div>
            "#},
        )
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing ch04...
    ├─ ch04.html
    │ <section id="old-style" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Old Style</h1>
    │ <section id="nested" data-type="sect1"><h1>Nested</h1></section>
    │ </section>
    "#);
}

#[test]
fn missing_chapter_root() {
    let book = Book::init()
        .page("broken.html", "<p>No sections here.</p>\n")
        .entry("broken.html")
        .chapter("never.html", r#"<section id="never"><h1>Never</h1></section>"#)
        .build();
    insta::assert_snapshot!(book, @r"
    ├─ log output
    │ Failed to process $ROOT/book/_build/html/broken.html: no top-level content section found
    ");
}

#[test]
fn heading_promotion() {
    let book = Book::init()
        .sections(&[
            (
                "deep.html",
                indoc! {r#"
                    <section id="deep">
                    <h1>Deep</h1>
                    <section id="two"><h2>Two</h2>
                    <section id="three"><h3>Three</h3>
                    <section id="four"><h4>Four</h4>
                    <section id="five"><h5>Five</h5>
                    <section id="six"><h6>Six</h6></section>
                    </section>
                    </section>
                    </section>
                    </section>
                    </section>
                "#},
            ),
            (
                "deep-01.html",
                r#"<section id="appended"><h1>Appended</h1><section id="inner"><h2>Inner</h2></section></section>"#,
            ),
        ])
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing deep...
    ├─ deep.html
    │ <section id="deep" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Deep</h1>
    │ <section id="two" data-type="sect1"><h1>Two</h1>
    │ <section id="three" data-type="sect2"><h2>Three</h2>
    │ <section id="four" data-type="sect3"><h3>Four</h3>
    │ <section id="five" data-type="sect4"><h4>Five</h4>
    │ <section id="six" data-type="sect5"><h5>Six</h5></section>
    │ </section>
    │ </section>
    │ </section>
    │ </section>
    │ <section id="appended" data-type="sect1"><h1>Appended</h1><section id="inner" data-type="sect2"><h2>Inner</h2></section></section></section>
    "#);
}
