use indoc::indoc;

use super::Book;

#[test]
fn internal_references() {
    let book = Book::init()
        .chapter(
            "refs.html",
            indoc! {r##"
                <section id="refs">
                <h1>References</h1>
                <p>See <a class="reference internal" href="#my-figure"><span class="std std-ref">Figure 1</span></a> and <a class="reference internal" href="ch02.html#later-section"><span class="std std-ref">Later</span></a>.</p>
                <p>Whole chapter: <a class="reference internal" href="../notebooks/ch03.html"><span class="doc">Chapter 3</span></a>.</p>
                <p>External: <a class="reference internal" href="https://example.com/image.png">image</a>.</p>
                <p>Plain: <a class="reference external" href="https://jupyterbook.org">Jupyter Book</a>.</p>
                </section>
            "##},
        )
        .build();
    insta::assert_snapshot!(book, @r##"
    ├─ log output
    │  INFO jb_htmlbook: Processing refs...
    │  WARN jb_htmlbook::process::xref: External image reference: https://example.com/image.png
    ├─ refs.html
    │ <section id="refs" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>References</h1>
    │ <p>See <a class="reference internal" data-type="xref" href="#my-figure">#my-figure</a> and <a class="reference internal" data-type="xref" href="#later-section">#later-section</a>.</p>
    │ <p>Whole chapter: <a class="reference internal" data-type="xref" href="#ch03.html">#ch03.html</a>.</p>
    │ <p>External: <a class="reference internal" href="https://example.com/image.png">image</a>.</p>
    │ <p>Plain: <a class="reference external" href="https://jupyterbook.org">Jupyter Book</a>.</p>
    │ </section>
    "##);
}

#[test]
fn citations() {
    let book = Book::init()
        .chapter(
            "cites.html",
            indoc! {r#"
                <section id="cites">
                <h1>Citations</h1>
                <p>As shown <span id="id1">[<a class="reference internal" href="bibliography.html#baruch" title="Baruch, 1993">Baruch, 1993</a>]</span>, and again <span id="id2">[<a class="reference internal" href="bibliography.html#aadams">Aadams and Carver,
                2012</a>, <a class="reference internal" href="bibliography.html#carver">Carver, 2001</a>]</span>.</p>
                </section>
            "#},
        )
        .build();
    insta::assert_snapshot!(book, @r#"
    ├─ log output
    │  INFO jb_htmlbook: Processing cites...
    ├─ cites.html
    │ <section id="cites" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Citations</h1>
    │ <p>As shown <span>(Baruch 1993)</span>, and again <span>(Aadams and Carver 2012; Carver 2001)</span>.</p>
    │ </section>
    "#);
}

#[test]
fn pending_references() {
    let book = Book::init()
        .chapter(
            "pending.html",
            indoc! {r#"
                <section id="pending">
                <h1>Pending</h1>
                <p>See <span class="xref std std-ref">example-one</span> and <span class="xref std std-ref">not a valid target</span>.</p>
                </section>
            "#},
        )
        .build();
    insta::assert_snapshot!(book, @r##"
    ├─ log output
    │  INFO jb_htmlbook: Processing pending...
    │  WARN jb_htmlbook::process::xref: Unable to resolve cross reference <span class="xref std std-ref">not a valid target</span>
    ├─ pending.html
    │ <section id="pending" data-type="chapter" xmlns="http://www.w3.org/1999/xhtml">
    │ <h1>Pending</h1>
    │ <p>See <a data-type="xref" href="#example-one">#example-one</a> and <span class="xref std std-ref">not a valid target</span>.</p>
    │ </section>
    "##);
}
