use gstreamer as gst;

use crate::element::{Backend, Element};
use crate::error::LinkError;
use crate::gst::{GstBackend, from_link_error};

#[test]
fn test_pad_link_errors_keep_their_reason() {
    assert_eq!(from_link_error(gst::PadLinkError::WasLinked), LinkError::WasLinked);
    assert_eq!(from_link_error(gst::PadLinkError::Noformat), LinkError::NoFormat);
    assert_eq!(
        from_link_error(gst::PadLinkError::WrongHierarchy),
        LinkError::WrongHierarchy
    );
    assert_eq!(from_link_error(gst::PadLinkError::Nosched), LinkError::Refused);
}

#[test]
fn test_element_link_without_pads_is_not_a_format_error() {
    gst::init().unwrap();
    let sink = GstBackend.make_element("fakesink", "sink").unwrap();
    let queue = GstBackend.make_element("queue", "queue").unwrap();

    // fakesink has no source pad at all
    assert_eq!(sink.link(&queue), Err(LinkError::Refused));
}
