pub mod expression {
    macro_rules! and {
        ($($child:expr),* $(,)?) => {
            $crate::expression::Group::new(
                $crate::expression::Operator::And,
                vec![$($crate::expression::ExpressionNode::from($child)),*],
            )
        };
    }

    macro_rules! or {
        ($($child:expr),* $(,)?) => {
            $crate::expression::Group::new(
                $crate::expression::Operator::Or,
                vec![$($crate::expression::ExpressionNode::from($child)),*],
            )
        };
    }

    pub(crate) use and;
    pub(crate) use or;
}

pub mod widgets {
    macro_rules! group {
        ($operator:expr; $($child:expr),* $(,)?) => {
            $crate::builder::GroupWidget {
                operator: $operator,
                children: vec![$($crate::builder::Widget::from($child)),*],
            }
        };
    }

    macro_rules! event_segment {
        ($parameter:expr, $comparator:expr, $value:expr) => {
            $crate::builder::SegmentWidget {
                source: Some($crate::builder::SourceKind::Event),
                parameter: Some($parameter.to_owned()),
                comparator: Some($comparator),
                value: $value.to_owned(),
                ..Default::default()
            }
        };
    }

    macro_rules! device_segment {
        ($device:expr, $parameter:expr, $comparator:expr, $value:expr) => {
            $crate::builder::SegmentWidget {
                source: Some($crate::builder::SourceKind::Device),
                device: Some($device.to_owned()),
                parameter: Some($parameter.to_owned()),
                comparator: Some($comparator),
                value: $value.to_owned(),
                ..Default::default()
            }
        };
    }

    macro_rules! variable_segment {
        ($name:expr, $comparator:expr, $value:expr) => {
            $crate::builder::SegmentWidget {
                source: Some($crate::builder::SourceKind::Variable),
                variable: Some($name.to_owned()),
                comparator: Some($comparator),
                value: $value.to_owned(),
                ..Default::default()
            }
        };
    }

    pub(crate) use device_segment;
    pub(crate) use event_segment;
    pub(crate) use group;
    pub(crate) use variable_segment;
}
