use std::sync::Arc;

use anyhow::Result;
use domx_bridge::{BridgeContext, HostNodeExt, QueryOutcome, XmlValueExt};
use domx_core::{HostDocument, XmlValue};
use domx_host_mock::{MockCodec, MockDocument, MockDocumentFactory, MockEvaluator};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let document: Arc<dyn HostDocument> = MockDocument::new();
    let context = BridgeContext::new(
        document,
        Arc::new(MockDocumentFactory::default()),
        Arc::new(MockCodec::new()),
        Arc::new(MockEvaluator::new()),
    );

    let library = XmlValue::parse(
        r#"<library><book id="1"><title>Dune</title></book><book id="2"><title>Hyperion</title></book></library>"#,
    )?;

    if let Some(node) = library.dom_node(&context)? {
        println!("host tree:  {}", context.codec().serialize(&node)?);
        let back = node.to_xml(&context)?;
        println!("round trip: {}", back.xml_string());
    }

    match library.xpath(&context, "count(*)")? {
        QueryOutcome::Number(count) => println!("books:      {count}"),
        other => println!("unexpected result: {other:?}"),
    }

    match library.xpath(&context, "//title")? {
        QueryOutcome::Xml(titles) => {
            for title in titles.iter() {
                println!("title:      {}", title.string_value());
            }
        }
        other => println!("unexpected result: {other:?}"),
    }

    Ok(())
}
